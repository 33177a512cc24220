use crate::ai_gateway::AiGateway;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The only path to the generative-language provider.
    pub gateway: AiGateway,
    pub store: RecordStore,
}
