//! Caller roles and the role-capability table.
//!
//! Role names must match the `role` claim issued by the identity provider.
//! Unknown names are rejected when the credential is resolved, never deep
//! inside the engine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_PERFORMER: &str = "performer";
pub const ROLE_SAFETY_OFFICER: &str = "safety_officer";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLIENT: &str = "client";

/// Closed set of roles the moderation core recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Performer,
    SafetyOfficer,
    Moderator,
    Admin,
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Performer => ROLE_PERFORMER,
            Role::SafetyOfficer => ROLE_SAFETY_OFFICER,
            Role::Moderator => ROLE_MODERATOR,
            Role::Admin => ROLE_ADMIN,
            Role::Client => ROLE_CLIENT,
        }
    }

    /// Look up this role in the capability table.
    ///
    /// `admin` satisfies every capability.
    pub fn can(self, capability: Capability) -> bool {
        if self == Role::Admin {
            return true;
        }
        match capability {
            Capability::CreateContent | Capability::SubmitContent => self == Role::Performer,
            Capability::ReviewSafety => self == Role::SafetyOfficer,
            Capability::ReviewModeration => self == Role::Moderator,
            Capability::EmergencyStop => {
                matches!(self, Role::SafetyOfficer | Role::Performer)
            }
            Capability::ViewModerationQueue | Capability::ViewAuditTrail => {
                matches!(self, Role::SafetyOfficer | Role::Moderator)
            }
            Capability::CreateBooking => self == Role::Client,
        }
    }

    /// Fail with [`CoreError::Forbidden`] unless this role holds `capability`.
    pub fn require(self, capability: Capability) -> Result<(), CoreError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Role '{}' may not {}",
                self.as_str(),
                capability.describe()
            )))
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_PERFORMER => Ok(Role::Performer),
            ROLE_SAFETY_OFFICER => Ok(Role::SafetyOfficer),
            ROLE_MODERATOR => Ok(Role::Moderator),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_CLIENT => Ok(Role::Client),
            other => Err(CoreError::Unauthenticated(format!("Unknown role '{other}'"))),
        }
    }
}

/// Actions gated by the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CreateContent,
    SubmitContent,
    ReviewSafety,
    ReviewModeration,
    EmergencyStop,
    ViewModerationQueue,
    ViewAuditTrail,
    CreateBooking,
}

impl Capability {
    fn describe(self) -> &'static str {
        match self {
            Capability::CreateContent => "create content",
            Capability::SubmitContent => "submit content for review",
            Capability::ReviewSafety => "perform safety review",
            Capability::ReviewModeration => "perform moderation review",
            Capability::EmergencyStop => "trigger an emergency stop",
            Capability::ViewModerationQueue => "view the moderation queue",
            Capability::ViewAuditTrail => "view audit trails",
            Capability::CreateBooking => "create bookings",
        }
    }
}
