use std::time::Duration;

use anyhow::{Context, Result};

use crate::ai_gateway::{ModelTier, DEFAULT_MODEL_TIERS};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required storage variables are missing.
///
/// The Gemini key is optional here: a missing key surfaces as a
/// configuration error on the first AI call, never as a silent bypass.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub model_tiers: Vec<ModelTier>,
    pub backoff_unit: Duration,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backoff_ms = match std::env::var("AI_BACKOFF_UNIT_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("AI_BACKOFF_UNIT_MS must be a whole number of milliseconds")?,
            Err(_) => 1000,
        };

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            model_tiers: optional_env("GEMINI_MODEL_TIERS")
                .map(|raw| parse_model_tiers(&raw))
                .filter(|tiers| !tiers.is_empty())
                .unwrap_or_else(default_model_tiers),
            backoff_unit: Duration::from_millis(backoff_ms),
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn default_model_tiers() -> Vec<ModelTier> {
    DEFAULT_MODEL_TIERS
        .iter()
        .enumerate()
        .map(|(i, model)| ModelTier::new(*model, i as u32))
        .collect()
}

/// Comma-separated model list; position in the list is the priority.
fn parse_model_tiers(raw: &str) -> Vec<ModelTier> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .enumerate()
        .map(|(i, model)| ModelTier::new(model, i as u32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers_are_three_in_priority_order() {
        let tiers = default_model_tiers();
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0].model, "gemini-flash-latest");
        assert_eq!(tiers[1].model, "gemini-pro-latest");
        assert_eq!(tiers[2].model, "gemini-flash-lite-latest");
        assert!(tiers.windows(2).all(|w| w[0].priority < w[1].priority));
    }

    #[test]
    fn test_parse_model_tiers_skips_blank_entries() {
        let tiers = parse_model_tiers(" a-model , ,b-model,");
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0], ModelTier::new("a-model", 0));
        assert_eq!(tiers[1], ModelTier::new("b-model", 1));
    }

    #[test]
    fn test_parse_model_tiers_empty_input() {
        assert!(parse_model_tiers("").is_empty());
    }
}
