mod handlers;
mod models;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::AppState;

pub use models::{ContactLinkRequest, ContactLinkResponse, ErrorResponse};

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/content-ideas", post(handlers::content_ideas))
        .route(
            "/api/media",
            post(handlers::upload_media).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/media/*public_id", delete(handlers::delete_media))
        .route("/api/sections", post(handlers::sections))
        .route("/api/contact-link", post(handlers::contact))
        .fallback(handlers::not_found)
        .with_state(state)
}
