use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes nested under `/bookings`.
///
/// ```text
/// POST   /                  create_booking
/// GET    /{id}              get_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(booking::create_booking))
        .route("/{id}", get(booking::get_booking))
}
