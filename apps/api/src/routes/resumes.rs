use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::StoredResumeRecord;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<StoredResumeRecord>>, AppError> {
    Ok(Json(state.store.list(params.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<StoredResumeRecord>, AppError> {
    let record = state
        .store
        .get(params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(record))
}

/// DELETE /api/v1/resumes/:id
///
/// Removes the record and, best-effort, its uploaded files.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete(params.user_id, id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
