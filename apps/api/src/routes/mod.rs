pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

use crate::render::handlers::handle_generate_improved_resume;
use crate::review::handlers::handle_upload_resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.allowed_origin)?;

    Ok(Router::new()
        .route("/health", get(health::health_handler))
        // The upload handler enforces its own streamed size cap.
        .route(
            "/upload_resume",
            post(handle_upload_resume).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/generate_improved_resume",
            post(handle_generate_improved_resume),
        )
        .layer(cors)
        .with_state(state))
}

/// One allowed origin, credentials allowed, any method and header.
/// Methods and headers are mirrored because `*` is invalid alongside credentials.
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("ALLOWED_ORIGIN '{origin}' is not a valid header value"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
