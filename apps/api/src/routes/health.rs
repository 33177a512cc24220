use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and whether an AI
/// credential is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resumind-api",
        "ai_configured": state.gateway.is_configured(),
        "model_tiers": state
            .gateway
            .tiers()
            .iter()
            .map(|t| t.model.as_str())
            .collect::<Vec<_>>(),
    }))
}
