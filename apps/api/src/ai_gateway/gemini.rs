//! Gemini `generateContent` transport. One HTTP request per call; the
//! fallback policy lives in `AiGateway`, not here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GenerativeProvider, ProviderError, ProviderRequest};

const API_VERSION: &str = "v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Thin wrapper over the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: String) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, API_VERSION, model
        )
    }
}

fn build_request<'a>(request: &ProviderRequest<'a>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: request
                .segments
                .iter()
                .map(|s| Part { text: s.as_str() })
                .collect(),
        }],
        generation_config: GenerationConfig {
            response_mime_type: request.format.mime_type(),
        },
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate(&self, request: ProviderRequest<'_>) -> Result<String, ProviderError> {
        let body = build_request(&request);

        let response = self
            .client
            .post(self.endpoint(request.model))
            .header("x-goog-api-key", request.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
                request.model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or_else(|| {
            let finish_reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("NO_CANDIDATES");
            warn!("Gemini returned no text: model={}, finish_reason={finish_reason}", request.model);
            ProviderError::EmptyContent
        })
    }
}
