//! Caller identity and the credential-resolution seam.
//!
//! The core never parses credentials itself. An [`IdentityResolver`]
//! turns an opaque credential into a [`Caller`]; the HTTP layer plugs in a
//! JWT-backed implementation.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// A resolved `(id, role)` pair for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub id: DbId,
    pub role: Role,
}

impl Caller {
    pub fn new(id: DbId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Resolves an opaque credential into a [`Caller`].
///
/// Implementations return [`CoreError::Unauthenticated`] when the
/// credential is missing, malformed, expired, or names an unknown role.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, credential: &str) -> Result<Caller, CoreError>;
}
