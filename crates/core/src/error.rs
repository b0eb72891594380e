use crate::types::DbId;

/// Domain error shared by the engine, the stores, and the HTTP layer.
///
/// Guard failures (`NotFound`, `Forbidden`, `InvalidState`) are expected
/// business outcomes. `Storage` means nothing was committed and the caller
/// may retry. `EmergencyStopPartialFailure` is the one outcome where some
/// writes may have landed.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Emergency stop partially failed: {message}")]
    EmergencyStopPartialFailure {
        cancelled_bookings: Option<u64>,
        secured_content: Option<u64>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the caller may safely retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Storage(_))
    }
}
