pub mod booking;
pub mod content;
pub mod emergency;
pub mod health;
pub mod moderation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /content                         create
/// /content/{id}                    get
/// /content/{id}/consent            consent record
/// /content/{id}/submit             submit for review (POST)
/// /content/{id}/approve            approve {kind} (POST)
/// /content/{id}/reject             reject {kind, reason?} (POST)
/// /content/{id}/audit              audit trail
///
/// /moderation/queue                content awaiting review
///
/// /bookings                        create
/// /bookings/{id}                   get
///
/// /emergency-stop                  emergency stop (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/content",
            content::router().merge(moderation::content_router()),
        )
        .nest("/moderation", moderation::router())
        .nest("/bookings", booking::router())
        .merge(emergency::router())
}
