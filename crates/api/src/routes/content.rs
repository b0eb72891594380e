use axum::routing::{get, post};
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Content lifecycle routes, nested under `/content`.
///
/// ```text
/// POST   /                  create_content
/// GET    /{id}              get_content
/// GET    /{id}/consent      get_consent
/// POST   /{id}/submit       submit_for_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(content::create_content))
        .route("/{id}", get(content::get_content))
        .route("/{id}/consent", get(content::get_consent))
        .route("/{id}/submit", post(content::submit_for_review))
}
