//! Section rewriting: free-form text tailored to a job description.

use crate::ai_gateway::prompts::PLAIN_TEXT_ONLY_INSTRUCTION;
use crate::ai_gateway::AiGateway;
use crate::analysis::prompts::{fill_template, TAILOR_TEMPLATE};
use crate::analysis::{truncate_chars, AnalysisError};

/// A single section, not a whole résumé, so the ceiling is low.
pub const TAILOR_MAX_CHARS: usize = 8_000;

/// The job description only supplies keywords here.
pub const TAILOR_JD_MAX_CHARS: usize = 4_000;

pub fn build_tailor_prompt(original_text: &str, job_description: &str) -> Vec<String> {
    let prompt = fill_template(
        TAILOR_TEMPLATE,
        &[
            ("plain_text_only", PLAIN_TEXT_ONLY_INSTRUCTION),
            (
                "job_description",
                truncate_chars(job_description, TAILOR_JD_MAX_CHARS),
            ),
            (
                "original_text",
                truncate_chars(original_text, TAILOR_MAX_CHARS),
            ),
        ],
    );
    vec![prompt]
}

/// Rewrites one résumé section. The model's text is returned unmodified.
pub async fn tailor_section(
    gateway: &AiGateway,
    original_text: &str,
    job_description: &str,
) -> Result<String, AnalysisError> {
    let segments = build_tailor_prompt(original_text, job_description);
    Ok(gateway.invoke(&segments, false).await?)
}
