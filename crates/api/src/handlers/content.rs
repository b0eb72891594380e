//! Handlers for content creation, reads, and submission.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use consentry_core::content::CreateContent;
use consentry_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/content
///
/// Create a draft owned by the caller, with an empty consent record.
pub async fn create_content(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateContent>,
) -> AppResult<impl IntoResponse> {
    let created = state.engine.create_content(&caller, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/content/{id}
pub async fn get_content(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let content = state.engine.get_content(&caller, id).await?;
    Ok(Json(DataResponse { data: content }))
}

/// GET /api/v1/content/{id}/consent
pub async fn get_consent(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let consent = state.engine.get_consent(&caller, id).await?;
    Ok(Json(DataResponse { data: consent }))
}

/// POST /api/v1/content/{id}/submit
///
/// The owning performer moves a draft into review, giving their consent.
pub async fn submit_for_review(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let submitted = state.engine.submit_for_review(&caller, id).await?;
    Ok(Json(DataResponse { data: submitted }))
}
