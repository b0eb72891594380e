use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use consentry_core::booking::CreateBooking;
use consentry_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/bookings
pub async fn create_booking(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = state.engine.create_booking(&caller, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = state.engine.get_booking(&caller, id).await?;
    Ok(Json(DataResponse { data: booking }))
}
