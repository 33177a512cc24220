pub mod health;
pub mod resumes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::insights::handlers as insights;
use crate::state::AppState;

/// Résumé uploads are the only large request bodies.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis tasks
        .route(
            "/api/v1/analyze",
            post(analysis::handle_analyze).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/tailor", post(analysis::handle_tailor))
        .route("/api/v1/interview", post(analysis::handle_interview))
        .route("/api/v1/cover-letter", post(analysis::handle_cover_letter))
        // Stored records
        .route("/api/v1/resumes", get(resumes::handle_list_resumes))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        // Insights
        .route("/api/v1/dashboard", get(insights::handle_dashboard))
        .route("/api/v1/compare", get(insights::handle_compare))
        .route("/api/v1/history", get(insights::handle_history))
        .with_state(state)
}
