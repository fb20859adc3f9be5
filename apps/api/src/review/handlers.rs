//! Axum route handler for resume review.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::review::prompts::{build_review_prompt, review_system_prompt};
use crate::review::report::{parse_completion, ScoreReport};
use crate::review::upload::{read_upload, validate_resume_text};
use crate::state::AppState;

/// POST /upload_resume
///
/// Pipeline: read + size-check upload → extract text → length window →
/// prompt → completion → parse. Every local check runs before the paid call.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScoreReport>, AppError> {
    let upload = read_upload(multipart).await?;
    info!(
        "Resume upload: file={} bytes={} company={} job_title={}",
        upload.filename,
        upload.file.len(),
        upload.company,
        upload.job_title
    );
    if let Some(jd) = &upload.job_description {
        debug!("Job description supplied ({} chars), not used in prompt", jd.len());
    }

    // CPU-bound extraction runs on the blocking pool.
    // pdf-extract can panic on malformed input, so a JoinError is a bad document too.
    let extractor = state.extractor.clone();
    let file = upload.file.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&file))
        .await
        .map_err(|e| {
            debug!("Extraction task failed: {e}");
            processing_error()
        })?
        .map_err(|e| {
            debug!("{e}");
            processing_error()
        })?;

    let resume_text = validate_resume_text(&text)?;

    let prompt = build_review_prompt(&upload.company, &upload.job_title, resume_text);
    let completion = state
        .completer
        .complete(&review_system_prompt(), &prompt)
        .await?;

    let report = parse_completion(&completion)?;
    info!("Review complete: overall_score={:.1}", report.overall_score);
    Ok(Json(report))
}

fn processing_error() -> AppError {
    AppError::InvalidDocument("Error processing PDF file".to_string())
}
