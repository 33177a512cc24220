//! Cover letter generation from a résumé and a job description.

use crate::ai_gateway::prompts::PLAIN_TEXT_ONLY_INSTRUCTION;
use crate::ai_gateway::AiGateway;
use crate::analysis::prompts::{fill_template, COVER_LETTER_TEMPLATE};
use crate::analysis::{truncate_chars, AnalysisError};

pub const COVER_LETTER_MAX_CHARS: usize = 20_000;
pub const COVER_LETTER_JD_MAX_CHARS: usize = 10_000;

pub fn build_cover_letter_prompt(resume_text: &str, job_description: &str) -> Vec<String> {
    let prompt = fill_template(
        COVER_LETTER_TEMPLATE,
        &[
            ("plain_text_only", PLAIN_TEXT_ONLY_INSTRUCTION),
            (
                "job_description",
                truncate_chars(job_description, COVER_LETTER_JD_MAX_CHARS),
            ),
            (
                "resume_text",
                truncate_chars(resume_text, COVER_LETTER_MAX_CHARS),
            ),
        ],
    );
    vec![prompt]
}

pub async fn generate_cover_letter(
    gateway: &AiGateway,
    resume_text: &str,
    job_description: &str,
) -> Result<String, AnalysisError> {
    let segments = build_cover_letter_prompt(resume_text, job_description);
    Ok(gateway.invoke(&segments, false).await?)
}
