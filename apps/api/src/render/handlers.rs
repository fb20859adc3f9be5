use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::render::ImprovedResumeRequest;
use crate::state::AppState;

pub const IMPROVED_RESUME_FILENAME: &str = "improved_resume.pdf";

/// POST /generate_improved_resume
///
/// Lays out one titled block per improvement and returns the PDF as an attachment.
/// Renderer failures are returned to the caller verbatim.
pub async fn handle_generate_improved_resume(
    State(state): State<AppState>,
    Json(request): Json<ImprovedResumeRequest>,
) -> Result<Response, AppError> {
    info!("Rendering improved resume: {} sections", request.improvements.len());
    debug!(
        "original_text={} chars, formatting_suggestions={} chars",
        request.original_text.len(),
        request.formatting_suggestions.len()
    );

    let renderer = state.renderer.clone();
    let sections = request.improvements;
    let pdf = tokio::task::spawn_blocking(move || renderer.render(&sections))
        .await
        .map_err(|e| AppError::Render(e.to_string()))?
        .map_err(|e| AppError::Render(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{IMPROVED_RESUME_FILENAME}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}
