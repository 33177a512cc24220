//! Résumé scoring: the structured feedback report and the task that produces it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::ai_gateway::prompts::JSON_ONLY_INSTRUCTION;
use crate::ai_gateway::AiGateway;
use crate::analysis::prompts::{
    fill_template, DEFAULT_TARGET_ROLE, SCORING_SYSTEM, SCORING_USER_TEMPLATE,
};
use crate::analysis::{decode_structured, truncate_chars, AnalysisError};

/// Résumé text beyond this many characters is dropped before scoring.
pub const SCORING_MAX_CHARS: usize = 30_000;
pub const SCORING_JD_MAX_CHARS: usize = 10_000;

pub const MAX_SCORE: u32 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Report model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipKind {
    Good,
    Improve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    #[serde(rename = "type")]
    pub kind: TipKind,
    pub tip: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u32,
    #[serde(default)]
    pub tips: Vec<Tip>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    #[serde(default)]
    pub found: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

impl KeywordMatch {
    /// Percentage of keywords found, rounded; 0 when there are none at all.
    pub fn match_rate(&self) -> u32 {
        let total = self.found.len() + self.missing.len();
        if total == 0 {
            return 0;
        }
        (self.found.len() as f64 / total as f64 * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub original: String,
    pub improved: String,
    #[serde(default)]
    pub reason: String,
}

/// Decoded result of the scoring task.
///
/// `overall_score` is weighted by the model and is not derived from the
/// category scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_score: u32,
    #[serde(rename = "ATS")]
    pub ats: CategoryScore,
    pub content: CategoryScore,
    pub structure: CategoryScore,
    pub skills: CategoryScore,
    pub tone_and_style: CategoryScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_match: Option<KeywordMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_suggestions: Option<Vec<ImprovementSuggestion>>,
}

/// The five scored categories of a feedback report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[serde(rename = "ATS")]
    Ats,
    Content,
    Structure,
    Skills,
    ToneAndStyle,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Ats,
        Category::Content,
        Category::Structure,
        Category::Skills,
        Category::ToneAndStyle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Ats => "ATS",
            Category::Content => "Content",
            Category::Structure => "Structure",
            Category::Skills => "Skills",
            Category::ToneAndStyle => "Tone & Style",
        }
    }
}

impl FeedbackReport {
    pub fn category(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Ats => &self.ats,
            Category::Content => &self.content,
            Category::Structure => &self.structure,
            Category::Skills => &self.skills,
            Category::ToneAndStyle => &self.tone_and_style,
        }
    }

    /// Checks that every score lies in [0, 100].
    pub fn validate(&self) -> Result<(), String> {
        if self.overall_score > MAX_SCORE {
            return Err(format!(
                "overallScore {} is outside 0-{MAX_SCORE}",
                self.overall_score
            ));
        }
        for category in Category::ALL {
            let score = self.category(category).score;
            if score > MAX_SCORE {
                return Err(format!(
                    "{} score {score} is outside 0-{MAX_SCORE}",
                    category.label()
                ));
            }
        }
        Ok(())
    }
}

/// Accepts any non-negative JSON number and rounds it to the nearest integer.
/// Models occasionally emit `82.0` where `82` was asked for.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw < 0.0 || raw > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "score {raw} is not a non-negative number"
        )));
    }
    Ok(raw.round() as u32)
}

// ────────────────────────────────────────────────────────────────────────────
// Task
// ────────────────────────────────────────────────────────────────────────────

/// Input for one scoring call. Built per user action and dropped afterwards.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub raw_text: String,
    pub job_description: Option<String>,
}

pub fn build_scoring_prompt(request: &AnalysisRequest) -> Vec<String> {
    let job_section = match request
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
    {
        Some(jd) => format!(
            "JOB DESCRIPTION:\n{}",
            truncate_chars(jd, SCORING_JD_MAX_CHARS)
        ),
        None => DEFAULT_TARGET_ROLE.to_string(),
    };

    let system = fill_template(SCORING_SYSTEM, &[("json_only", JSON_ONLY_INSTRUCTION)]);
    let user = fill_template(
        SCORING_USER_TEMPLATE,
        &[
            ("job_section", job_section.as_str()),
            (
                "resume_text",
                truncate_chars(&request.raw_text, SCORING_MAX_CHARS),
            ),
        ],
    );

    vec![system, user]
}

/// Scores a résumé. Structured output; a reply that is not a valid report
/// fails with `MalformedResponse` and is not retried.
pub async fn analyze_resume(
    gateway: &AiGateway,
    request: &AnalysisRequest,
) -> Result<FeedbackReport, AnalysisError> {
    let segments = build_scoring_prompt(request);
    let text = gateway.invoke(&segments, true).await?;

    let report: FeedbackReport = decode_structured(&text)?;
    report.validate().map_err(AnalysisError::MalformedResponse)?;

    Ok(report)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::ai_gateway::testing::{FakeProvider, Outcome};
    use crate::ai_gateway::AiGateway;

    pub(crate) fn report_json(overall: u32) -> String {
        format!(
            r#"{{
                "overallScore": {overall},
                "ATS": {{"score": 75, "tips": [{{"type": "good", "tip": "Clean layout", "explanation": "Parses well"}}]}},
                "content": {{"score": 68, "tips": [{{"type": "improve", "tip": "Add metrics", "explanation": "No numbers"}}]}},
                "structure": {{"score": 90, "tips": []}},
                "skills": {{"score": 55, "tips": []}},
                "toneAndStyle": {{"score": 80, "tips": []}},
                "keywordMatch": {{"found": ["Rust", "Kafka", "gRPC"], "missing": ["Kubernetes"]}},
                "improvementSuggestions": [
                    {{"original": "Worked on API.", "improved": "Built an API serving 10k req/day.", "reason": "Quantify impact"}}
                ]
            }}"#
        )
    }

    fn gateway(provider: Arc<FakeProvider>) -> AiGateway {
        AiGateway::new(
            provider,
            Some("key".into()),
            crate::config::default_model_tiers(),
            Duration::from_secs(1),
        )
    }

    fn request(text: &str) -> AnalysisRequest {
        AnalysisRequest {
            raw_text: text.to_string(),
            job_description: None,
        }
    }

    #[test]
    fn test_feedback_report_deserializes_contract_shape() {
        let report: FeedbackReport = serde_json::from_str(&report_json(82)).unwrap();
        assert_eq!(report.overall_score, 82);
        assert_eq!(report.ats.score, 75);
        assert_eq!(report.ats.tips[0].kind, TipKind::Good);
        assert_eq!(report.content.tips[0].kind, TipKind::Improve);
        assert_eq!(report.tone_and_style.score, 80);
        assert_eq!(
            report.improvement_suggestions.as_ref().unwrap()[0].reason,
            "Quantify impact"
        );
        assert!(report.validate().is_ok());
    }

    #[test]
    fn test_feedback_report_roundtrip_preserves_scores_and_keyword_order() {
        let report: FeedbackReport = serde_json::from_str(&report_json(82)).unwrap();
        let encoded = serde_json::to_string(&report).unwrap();
        let decoded: FeedbackReport = serde_json::from_str(&encoded).unwrap();

        for category in Category::ALL {
            assert!(decoded.category(category).score <= MAX_SCORE);
        }
        let kw = decoded.keyword_match.unwrap();
        assert_eq!(kw.found, vec!["Rust", "Kafka", "gRPC"]);
        assert_eq!(kw.missing, vec!["Kubernetes"]);
        assert!(encoded.contains("\"ATS\""));
        assert!(encoded.contains("\"toneAndStyle\""));
    }

    #[test]
    fn test_optional_sections_may_be_absent() {
        let json = r#"{
            "overallScore": 50,
            "ATS": {"score": 50, "tips": []},
            "content": {"score": 50, "tips": []},
            "structure": {"score": 50, "tips": []},
            "skills": {"score": 50, "tips": []},
            "toneAndStyle": {"score": 50, "tips": []}
        }"#;
        let report: FeedbackReport = serde_json::from_str(json).unwrap();
        assert!(report.keyword_match.is_none());
        assert!(report.improvement_suggestions.is_none());
        let encoded = serde_json::to_string(&report).unwrap();
        assert!(!encoded.contains("keywordMatch"));
    }

    #[test]
    fn test_fractional_score_is_rounded() {
        let json = report_json(82).replace("\"overallScore\": 82", "\"overallScore\": 81.6");
        let report: FeedbackReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.overall_score, 82);
    }

    #[test]
    fn test_negative_score_is_rejected() {
        let json = report_json(82).replace("\"score\": 55", "\"score\": -5");
        assert!(serde_json::from_str::<FeedbackReport>(&json).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_category() {
        let json = report_json(82).replace("\"score\": 90", "\"score\": 140");
        let report: FeedbackReport = serde_json::from_str(&json).unwrap();
        let err = report.validate().unwrap_err();
        assert!(err.contains("Structure"));
    }

    #[test]
    fn test_keyword_match_rate() {
        let kw = KeywordMatch {
            found: vec!["a".into(), "b".into()],
            missing: vec!["c".into()],
        };
        assert_eq!(kw.match_rate(), 67);
        assert_eq!(KeywordMatch::default().match_rate(), 0);
    }

    #[test]
    fn test_prompt_uses_default_role_without_job_description() {
        let segments = build_scoring_prompt(&request("resume"));
        assert_eq!(segments.len(), 2);
        assert!(segments[0].contains("RETURN ONLY JSON"));
        assert!(segments[1].contains(DEFAULT_TARGET_ROLE));
    }

    #[test]
    fn test_prompt_includes_job_description() {
        let segments = build_scoring_prompt(&AnalysisRequest {
            raw_text: "resume".into(),
            job_description: Some("Rust engineer, Kafka".into()),
        });
        assert!(segments[1].contains("JOB DESCRIPTION:\nRust engineer, Kafka"));
        assert!(!segments[1].contains(DEFAULT_TARGET_ROLE));
    }

    #[test]
    fn test_placeholder_in_job_description_does_not_duplicate_resume() {
        let segments = build_scoring_prompt(&AnalysisRequest {
            raw_text: "§".repeat(SCORING_MAX_CHARS + 100),
            job_description: Some("Senior role {resume_text} {json_only}".into()),
        });
        assert_eq!(segments[1].matches('§').count(), SCORING_MAX_CHARS);
        assert!(segments[1].contains("Senior role {resume_text} {json_only}"));
    }

    #[test]
    fn test_job_description_is_truncated() {
        let jd = format!("{}{}", "d".repeat(SCORING_JD_MAX_CHARS), "Ж".repeat(1_000));
        let segments = build_scoring_prompt(&AnalysisRequest {
            raw_text: "resume".into(),
            job_description: Some(jd),
        });
        assert!(segments[1].contains(&"d".repeat(SCORING_JD_MAX_CHARS)));
        assert!(!segments[1].contains('Ж'));
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_timeout_then_secondary_report() {
        let provider = Arc::new(FakeProvider::new(vec![
            Outcome::Fail(504),
            Outcome::Text(report_json(82)),
        ]));
        let gw = gateway(provider.clone());

        let report = analyze_resume(&gw, &request("Senior engineer")).await.unwrap();

        assert_eq!(report.overall_score, 82);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_oversized_resume_is_truncated_before_submission() {
        let provider = Arc::new(FakeProvider::new(vec![Outcome::Text(report_json(70))]));
        let gw = gateway(provider.clone());
        let text = format!("{}{}", "x".repeat(SCORING_MAX_CHARS), "Ω".repeat(20_000));
        assert_eq!(text.chars().count(), 50_000);

        analyze_resume(&gw, &request(&text)).await.unwrap();

        let calls = provider.calls();
        let user_segment = &calls[0].segments[1];
        assert!(user_segment.contains(&"x".repeat(SCORING_MAX_CHARS)));
        assert!(!user_segment.contains('Ω'));
        assert!(calls[0].format == crate::ai_gateway::ResponseFormat::Json);
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed_response() {
        let provider = Arc::new(FakeProvider::new(vec![Outcome::Ok(
            r#"{"overallScore": 82, "ATS": "#,
        )]));
        let gw = gateway(provider.clone());

        let err = analyze_resume(&gw, &request("resume")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_report_is_malformed_response() {
        let provider = Arc::new(FakeProvider::new(vec![Outcome::Text(report_json(130))]));
        let gw = gateway(provider);

        let err = analyze_resume(&gw, &request("resume")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let provider = Arc::new(FakeProvider::new(vec![]));
        let gw = AiGateway::new(
            provider.clone(),
            None,
            crate::config::default_model_tiers(),
            Duration::ZERO,
        );

        let err = analyze_resume(&gw, &request("resume")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
        assert_eq!(provider.call_count(), 0);
    }
}
