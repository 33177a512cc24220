// Analysis tasks built on the AI gateway: scoring, section rewriting,
// interview questions, cover letters. Each task owns its prompt template,
// its input ceiling and its output shape. All calls go through ai_gateway.

pub mod cover_letter;
pub mod handlers;
pub mod interview;
pub mod prompts;
pub mod scoring;
pub mod tailor;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::ai_gateway::{strip_json_fences, GatewayError, TierFailure};

/// Terminal outcomes of an analysis task. The caller's only recovery is to
/// let the user retry the action.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("AI configuration error: {0}")]
    Configuration(String),

    #[error("AI service unavailable. Please try again later.")]
    ProviderUnavailable(Vec<TierFailure>),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

impl From<GatewayError> for AnalysisError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Configuration(msg) => AnalysisError::Configuration(msg),
            GatewayError::ProviderUnavailable { failures } => {
                AnalysisError::ProviderUnavailable(failures)
            }
        }
    }
}

/// Returns at most `max_chars` leading characters of `text`.
/// Counts chars, not bytes, so a multi-byte sequence is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Decodes a structured-output response. Tolerates one wrapping code fence;
/// anything else that is not valid JSON for `T` is a malformed response.
pub fn decode_structured<T: DeserializeOwned>(text: &str) -> Result<T, AnalysisError> {
    serde_json::from_str(strip_json_fences(text))
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_prefix() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }

    #[test]
    fn test_truncate_short_input_unchanged() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_truncate_multibyte_does_not_split() {
        let text = "résumé—ünïcode";
        let cut = truncate_chars(text, 6);
        assert_eq!(cut, "résumé");
        assert_eq!(cut.chars().count(), 6);
    }

    #[test]
    fn test_decode_structured_rejects_truncated_json() {
        let err = decode_structured::<serde_json::Value>(r#"{"overallScore": 82, "ATS": {"#)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_structured_accepts_fenced_json() {
        let value: serde_json::Value = decode_structured("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_gateway_errors_map_one_to_one() {
        let e = AnalysisError::from(GatewayError::Configuration("x".into()));
        assert!(matches!(e, AnalysisError::Configuration(_)));

        let e = AnalysisError::from(GatewayError::ProviderUnavailable {
            failures: vec![TierFailure {
                model: "m".into(),
                reason: "r".into(),
            }],
        });
        match e {
            AnalysisError::ProviderUnavailable(failures) => assert_eq!(failures.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }
}
