//! Bearer-credential extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use consentry_core::error::CoreError;
use consentry_core::identity::Caller;

use crate::error::AppError;
use crate::state::AppState;

/// Caller resolved from the `Authorization: Bearer <token>` header.
///
/// Authorization (what the caller may do) is left to the engine; this
/// extractor only establishes who the caller is.
///
/// ```ignore
/// async fn my_handler(AuthUser(caller): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = caller.id, role = %caller.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Caller);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthenticated(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let caller = state.identity.resolve(token)?;
        Ok(AuthUser(caller))
    }
}
