use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/emergency-stop
///
/// Cancel in-flight bookings and checkpoint content under review. Safety
/// officers and admins stop the platform; performers stop their own
/// operations. A partial failure answers 500 with
/// `EMERGENCY_STOP_PARTIAL_FAILURE` and the counts that did commit.
pub async fn emergency_stop(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let report = state.engine.emergency_stop(&caller).await?;
    Ok(Json(DataResponse { data: report }))
}
