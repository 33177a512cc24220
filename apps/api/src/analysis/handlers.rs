//! Axum route handlers for the analysis tasks.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::cover_letter::generate_cover_letter;
use crate::analysis::interview::{generate_interview_questions, InterviewQuestions};
use crate::analysis::scoring::{analyze_resume, AnalysisRequest};
use crate::analysis::tailor::tailor_section;
use crate::errors::AppError;
use crate::extract::{extract_text, DocumentKind};
use crate::models::resume::StoredResumeRecord;
use crate::state::AppState;
use crate::store::resume_blob_path;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub rewritten: String,
}

/// Either `resume_text` or a stored record (`user_id` + `resume_id`).
/// Text wins when both are given.
#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub resume_id: Option<Uuid>,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

/// Fields collected from the analyze upload form.
#[derive(Debug, Default)]
struct UploadForm {
    user_id: Option<Uuid>,
    file: Option<(Option<String>, Option<String>, Bytes)>,
    company_name: Option<String>,
    job_title: Option<String>,
    job_description: Option<String>,
}

fn require_text(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Résumé context for a task: the supplied text, or else a context built
/// from the caller's stored record.
async fn resume_context(
    state: &AppState,
    resume_text: Option<String>,
    user_id: Option<Uuid>,
    resume_id: Option<Uuid>,
    from_record: fn(&StoredResumeRecord) -> Result<String, AppError>,
) -> Result<String, AppError> {
    if let Some(text) = resume_text.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }

    let (Some(user_id), Some(resume_id)) = (user_id, resume_id) else {
        return Err(AppError::Validation(
            "resume_text or user_id with resume_id is required".to_string(),
        ));
    };

    let record = state
        .store
        .get(user_id, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    from_record(&record)
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let bad_body = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("invalid multipart body: {e}"))
    };

    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_body)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "user_id" => {
                let raw = field.text().await.map_err(bad_body)?;
                let id = raw
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?;
                form.user_id = Some(id);
            }
            "file" => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await.map_err(bad_body)?;
                form.file = Some((file_name, content_type, bytes));
            }
            "company_name" => form.company_name = non_empty(field.text().await.map_err(bad_body)?),
            "job_title" => form.job_title = non_empty(field.text().await.map_err(bad_body)?),
            "job_description" => {
                form.job_description = non_empty(field.text().await.map_err(bad_body)?)
            }
            _ => {}
        }
    }

    Ok(form)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload: extract text → score → store file and record.
/// Nothing is stored unless scoring succeeds.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StoredResumeRecord>, AppError> {
    let form = read_form(multipart).await?;

    let user_id = form
        .user_id
        .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    let (file_name, content_type, bytes) = form
        .file
        .ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let kind = DocumentKind::detect(file_name.as_deref(), content_type.as_deref())?;
    let raw_text = extract_text(kind, bytes.clone()).await?;

    let feedback = analyze_resume(
        &state.gateway,
        &AnalysisRequest {
            raw_text,
            job_description: form.job_description,
        },
    )
    .await?;

    let id = Uuid::new_v4();
    let record = StoredResumeRecord {
        id,
        company_name: form.company_name,
        job_title: form.job_title,
        feedback,
        resume_path: resume_blob_path(user_id, id, kind.extension()),
        image_path: None,
        created_at: Utc::now(),
    };

    state
        .store
        .save(user_id, &record, bytes, kind.content_type())
        .await?;

    Ok(Json(record))
}

/// POST /api/v1/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    require_text(&request.resume_text, "resume_text")?;
    require_text(&request.job_description, "job_description")?;

    let rewritten =
        tailor_section(&state.gateway, &request.resume_text, &request.job_description).await?;

    Ok(Json(TailorResponse { rewritten }))
}

/// POST /api/v1/interview
///
/// Works from pasted text or from a previously analysed record.
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Json<InterviewQuestions>, AppError> {
    let resume_text = resume_context(
        &state,
        request.resume_text,
        request.user_id,
        request.resume_id,
        |record| Ok(record.interview_context()),
    )
    .await?;

    let questions = generate_interview_questions(&state.gateway, &resume_text).await?;

    Ok(Json(questions))
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require_text(&request.job_description, "job_description")?;

    let resume_text = resume_context(
        &state,
        request.resume_text,
        request.user_id,
        request.resume_id,
        |record| {
            record
                .feedback_context()
                .map_err(|e| AppError::Internal(e.into()))
        },
    )
    .await?;

    let cover_letter =
        generate_cover_letter(&state.gateway, &resume_text, &request.job_description).await?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}
