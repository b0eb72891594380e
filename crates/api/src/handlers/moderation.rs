//! Handlers for the dual-review workflow: approve, reject, queue, and
//! audit trail.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use consentry_core::consent::ApprovalKind;
use consentry_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /content/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub kind: ApprovalKind,
}

/// Body for `POST /content/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub kind: ApprovalKind,
    pub reason: Option<String>,
}

/// Query parameters for the moderation queue.
#[derive(Debug, Deserialize)]
pub struct QueueParams {
    pub limit: Option<i64>,
}

/// POST /api/v1/content/{id}/approve
///
/// Record a safety or moderation approval. The response carries the
/// resulting status, `approved` once both reviewers have signed off.
pub async fn approve(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ApproveRequest>,
) -> AppResult<impl IntoResponse> {
    let reviewed = state.engine.approve(&caller, id, input.kind).await?;
    Ok(Json(DataResponse { data: reviewed }))
}

/// POST /api/v1/content/{id}/reject
pub async fn reject(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<RejectRequest>,
) -> AppResult<impl IntoResponse> {
    let reviewed = state
        .engine
        .reject(&caller, id, input.kind, input.reason)
        .await?;
    Ok(Json(DataResponse { data: reviewed }))
}

/// GET /api/v1/content/{id}/audit
pub async fn audit_trail(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let events = state.engine.audit_trail(&caller, id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/moderation/queue?limit=N
pub async fn moderation_queue(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<QueueParams>,
) -> AppResult<impl IntoResponse> {
    let queue = state.engine.moderation_queue(&caller, params.limit).await?;
    Ok(Json(DataResponse { data: queue }))
}
