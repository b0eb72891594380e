use axum::routing::post;
use axum::Router;

use crate::handlers::emergency;
use crate::state::AppState;

/// `POST /emergency-stop`, merged at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new().route("/emergency-stop", post(emergency::emergency_stop))
}
