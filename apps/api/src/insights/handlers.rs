use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::insights::compare::{compare, Comparison};
use crate::insights::dashboard::{summarize, DashboardSummary};
use crate::insights::history::{score_history, ScoreHistory};
use crate::routes::resumes::UserIdQuery;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CompareQuery {
    pub user_id: Uuid,
    pub a: Uuid,
    pub b: Uuid,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DashboardSummary>, AppError> {
    let records = state.store.list(params.user_id).await?;
    Ok(Json(summarize(&records)))
}

/// GET /api/v1/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    Query(params): Query<CompareQuery>,
) -> Result<Json<Comparison>, AppError> {
    if params.a == params.b {
        return Err(AppError::Validation(
            "choose two different resumes to compare".to_string(),
        ));
    }

    let a = state
        .store
        .get(params.user_id, params.a)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", params.a)))?;
    let b = state
        .store
        .get(params.user_id, params.b)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", params.b)))?;

    Ok(Json(compare(&a, &b)))
}

/// GET /api/v1/history
///
/// `null` until the user has at least two analyses.
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Option<ScoreHistory>>, AppError> {
    let records = state.store.list(params.user_id).await?;
    Ok(Json(score_history(&records)))
}
