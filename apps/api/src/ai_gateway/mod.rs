//! AI Gateway: the single point of entry for all generative-language calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! All AI interactions MUST go through `AiGateway::invoke`.
//!
//! The gateway walks an ordered list of model tiers. Each tier gets exactly
//! one attempt; on failure it sleeps a linear back-off and moves to the next
//! tier. Only when every tier has failed does the caller see an error.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;

pub mod gemini;
pub mod prompts;
#[cfg(test)]
pub mod testing;

pub use gemini::GeminiClient;

/// Default fallback chain, highest priority first.
pub const DEFAULT_MODEL_TIERS: [&str; 3] = [
    "gemini-flash-latest",
    "gemini-pro-latest",
    "gemini-flash-lite-latest",
];

/// One model identifier in the fallback chain. Lower priority is tried first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTier {
    pub model: String,
    pub priority: u32,
}

impl ModelTier {
    pub fn new(model: impl Into<String>, priority: u32) -> Self {
        Self {
            model: model.into(),
            priority,
        }
    }
}

/// Response format the provider is instructed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    PlainText,
    Json,
}

impl ResponseFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ResponseFormat::PlainText => "text/plain",
            ResponseFormat::Json => "application/json",
        }
    }
}

/// A single attempt against a single model.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub segments: &'a [String],
    pub format: ResponseFormat,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider returned no text content")]
    EmptyContent,
}

/// Transport to a generative-language backend. One call, no retries.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate(&self, request: ProviderRequest<'_>) -> Result<String, ProviderError>;
}

/// Why one tier failed. Kept for logs; never shown to end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFailure {
    pub model: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("AI configuration error: {0}")]
    Configuration(String),

    #[error("AI service unavailable. Please try again later.")]
    ProviderUnavailable { failures: Vec<TierFailure> },
}

/// Cheap to clone; all clones share the provider and tier list.
#[derive(Clone)]
pub struct AiGateway {
    provider: Arc<dyn GenerativeProvider>,
    api_key: Option<Arc<str>>,
    tiers: Arc<[ModelTier]>,
    backoff_unit: Duration,
}

impl AiGateway {
    pub fn new(
        provider: Arc<dyn GenerativeProvider>,
        api_key: Option<String>,
        mut tiers: Vec<ModelTier>,
        backoff_unit: Duration,
    ) -> Self {
        // stable: equal priorities keep their given order
        tiers.sort_by_key(|t| t.priority);
        Self {
            provider,
            api_key: api_key
                .filter(|k| !k.trim().is_empty())
                .map(Arc::from),
            tiers: tiers.into(),
            backoff_unit,
        }
    }

    /// Builds a gateway backed by the Gemini REST API.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = GeminiClient::new(config.gemini_api_base.clone())?;
        Ok(Self::new(
            Arc::new(provider),
            config.gemini_api_key.clone(),
            config.model_tiers.clone(),
            config.backoff_unit,
        ))
    }

    pub fn tiers(&self) -> &[ModelTier] {
        &self.tiers
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Submits `segments` as one request and returns the first tier's text
    /// that succeeds. `structured_output` asks the provider for JSON.
    pub async fn invoke(
        &self,
        segments: &[String],
        structured_output: bool,
    ) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GatewayError::Configuration("GEMINI_API_KEY is not set".to_string())
        })?;

        let format = if structured_output {
            ResponseFormat::Json
        } else {
            ResponseFormat::PlainText
        };

        let mut failures = Vec::with_capacity(self.tiers.len());

        for (index, tier) in self.tiers.iter().enumerate() {
            if index > 0 {
                let delay = backoff_before(self.backoff_unit, index);
                warn!(
                    "Switching to fallback model {} after {}ms",
                    tier.model,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            info!(model = %tier.model, tier = index + 1, "AI attempt started");

            let request = ProviderRequest {
                api_key,
                model: &tier.model,
                segments,
                format,
            };

            match self.provider.generate(request).await {
                Ok(text) => {
                    info!(model = %tier.model, tier = index + 1, "AI attempt succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model = %tier.model, tier = index + 1, "AI attempt failed: {e}");
                    failures.push(TierFailure {
                        model: tier.model.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        error!("All {} AI model tiers failed: {:?}", failures.len(), failures);
        Err(GatewayError::ProviderUnavailable { failures })
    }
}

/// Delay slept before attempting the tier at `tier_index` (0-based).
/// Linear: nothing before the first tier, then 1 unit, 2 units, ...
pub fn backoff_before(unit: Duration, tier_index: usize) -> Duration {
    unit.saturating_mul(tier_index as u32)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
