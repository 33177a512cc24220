//! Scripted provider for gateway and task tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{GenerativeProvider, ProviderError, ProviderRequest, ResponseFormat};

/// What the next call should produce.
#[derive(Debug, Clone)]
pub enum Outcome {
    Ok(&'static str),
    Text(String),
    Fail(u16),
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub api_key: String,
    pub model: String,
    pub segments: Vec<String>,
    pub format: ResponseFormat,
    pub at: Instant,
}

/// Replays `Outcome`s in order, one per call, and records every request.
/// Calls past the end of the script fail with a 500.
pub struct FakeProvider {
    script: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeProvider {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn models_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls().into_iter().map(|c| c.at).collect()
    }
}

#[async_trait]
impl GenerativeProvider for FakeProvider {
    async fn generate(&self, request: ProviderRequest<'_>) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            api_key: request.api_key.to_string(),
            model: request.model.to_string(),
            segments: request.segments.to_vec(),
            format: request.format,
            at: Instant::now(),
        });

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Outcome::Ok(text)) => Ok(text.to_string()),
            Some(Outcome::Text(text)) => Ok(text),
            Some(Outcome::Fail(status)) => Err(ProviderError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(ProviderError::Api {
                status: 500,
                message: "script exhausted".to_string(),
            }),
        }
    }
}
