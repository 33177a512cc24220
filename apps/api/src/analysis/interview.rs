//! Mock interview questions probing the weakest parts of a résumé.

use serde::{Deserialize, Serialize};

use crate::ai_gateway::prompts::JSON_ONLY_INSTRUCTION;
use crate::ai_gateway::AiGateway;
use crate::analysis::prompts::{fill_template, INTERVIEW_TEMPLATE};
use crate::analysis::{decode_structured, truncate_chars, AnalysisError};

pub const INTERVIEW_MAX_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    /// Why the question is a useful probe.
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestions {
    pub questions: Vec<InterviewQuestion>,
}

pub fn build_interview_prompt(resume_text: &str) -> Vec<String> {
    let prompt = fill_template(
        INTERVIEW_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("resume_text", truncate_chars(resume_text, INTERVIEW_MAX_CHARS)),
        ],
    );
    vec![prompt]
}

pub async fn generate_interview_questions(
    gateway: &AiGateway,
    resume_text: &str,
) -> Result<InterviewQuestions, AnalysisError> {
    let segments = build_interview_prompt(resume_text);
    let text = gateway.invoke(&segments, true).await?;
    decode_structured(&text)
}
