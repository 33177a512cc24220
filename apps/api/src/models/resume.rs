use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::scoring::FeedbackReport;

/// An analysed résumé as persisted in the key-value store.
/// Field names match the JSON the browser UI already reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResumeRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub feedback: FeedbackReport,
    pub resume_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl StoredResumeRecord {
    /// Display label: company, then job title, then a generic fallback.
    pub fn label(&self) -> &str {
        [&self.company_name, &self.job_title]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("Resume")
    }

    /// Résumé context rebuilt from the stored feedback, used when the
    /// extracted text is no longer available.
    pub fn feedback_context(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.feedback)
    }

    /// Short candidate summary for interview questions: role, company,
    /// skills tips and overall score.
    pub fn interview_context(&self) -> String {
        let skills: Vec<&str> = self
            .feedback
            .skills
            .tips
            .iter()
            .map(|t| t.tip.as_str())
            .collect();
        let skills = if skills.is_empty() {
            "General Professional Skills".to_string()
        } else {
            skills.join(", ")
        };
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        format!(
            "Role: {}\nCompany: {}\nSkills: {}\nSummary: Score {}",
            non_blank(&self.job_title).unwrap_or_else(|| "Candidate".to_string()),
            non_blank(&self.company_name).unwrap_or_else(|| "Unknown Company".to_string()),
            skills,
            self.feedback.overall_score,
        )
    }

    /// Every blob path the record points at.
    pub fn blob_paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.resume_path.as_str()).chain(self.image_path.as_deref())
    }
}
