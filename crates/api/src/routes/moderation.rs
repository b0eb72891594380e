use axum::routing::{get, post};
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Review actions merged into `/content`.
///
/// ```text
/// POST   /{id}/approve      approve
/// POST   /{id}/reject       reject
/// GET    /{id}/audit        audit_trail
/// ```
pub fn content_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/approve", post(moderation::approve))
        .route("/{id}/reject", post(moderation::reject))
        .route("/{id}/audit", get(moderation::audit_trail))
}

/// Routes nested under `/moderation`.
///
/// ```text
/// GET    /queue             moderation_queue
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/queue", get(moderation::moderation_queue))
}
