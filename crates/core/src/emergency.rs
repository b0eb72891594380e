//! Emergency stop scope, outcome, and audit payloads.

use serde::Serialize;
use serde_json::json;

use crate::audit::{actions, subjects, NewAuditEvent};
use crate::identity::Caller;
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// Which rows an emergency stop touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "performer_id", rename_all = "snake_case")]
pub enum EmergencyScope {
    /// Every in-flight booking and every content item in review.
    Platform,
    /// Bookings with this performer and content this performer owns.
    Performer(DbId),
}

impl EmergencyScope {
    /// Performers stop their own operations; safety officers and admins
    /// stop the whole platform.
    pub fn for_caller(caller: &Caller) -> Self {
        match caller.role {
            Role::Performer => EmergencyScope::Performer(caller.id),
            _ => EmergencyScope::Platform,
        }
    }

    /// Performer a row must belong to, `None` for platform scope.
    pub fn performer_id(self) -> Option<DbId> {
        match self {
            EmergencyScope::Platform => None,
            EmergencyScope::Performer(id) => Some(id),
        }
    }

    /// Whether rows belonging to `performer_id` fall inside this scope.
    pub fn covers(self, performer_id: DbId) -> bool {
        match self {
            EmergencyScope::Platform => true,
            EmergencyScope::Performer(id) => id == performer_id,
        }
    }

    fn subject_id(self) -> Option<DbId> {
        self.performer_id()
    }
}

/// Successful emergency stop result returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyStopReport {
    pub scope: EmergencyScope,
    pub cancelled_bookings: u64,
    pub secured_content: u64,
    pub audit_event_id: DbId,
    pub triggered_at: Timestamp,
}

/// Outcome of each sub-operation of one emergency stop run.
#[derive(Debug, Clone)]
pub struct EmergencyRun {
    pub scope: EmergencyScope,
    pub triggered_at: Timestamp,
    pub cancelled_bookings: Result<u64, String>,
    pub secured_content: Result<u64, String>,
}

impl EmergencyRun {
    /// Both bulk updates committed.
    pub fn counts(&self) -> Option<(u64, u64)> {
        match (&self.cancelled_bookings, &self.secured_content) {
            (Ok(b), Ok(c)) => Some((*b, *c)),
            _ => None,
        }
    }

    pub fn success_event(&self, actor: &Caller, cancelled: u64, secured: u64) -> NewAuditEvent {
        NewAuditEvent::new(
            actor,
            actions::EMERGENCY_STOP,
            subjects::PLATFORM,
            self.scope.subject_id(),
            json!({
                "scope": self.scope,
                "cancelled_bookings": cancelled,
                "secured_content": secured,
                "role": actor.role,
                "triggered_at": self.triggered_at,
            }),
        )
    }

    /// Failure event; `extra_error` covers a failed success-event append.
    pub fn failure_event(&self, actor: &Caller, extra_error: Option<&str>) -> NewAuditEvent {
        let mut errors: Vec<String> = [&self.cancelled_bookings, &self.secured_content]
            .into_iter()
            .filter_map(|r| r.as_ref().err().cloned())
            .collect();
        errors.extend(extra_error.map(str::to_string));

        NewAuditEvent::new(
            actor,
            actions::EMERGENCY_STOP_FAILED,
            subjects::PLATFORM,
            self.scope.subject_id(),
            json!({
                "scope": self.scope,
                "cancelled_bookings": self.cancelled_bookings.as_ref().ok(),
                "secured_content": self.secured_content.as_ref().ok(),
                "errors": errors,
                "role": actor.role,
                "triggered_at": self.triggered_at,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(bookings: Result<u64, String>, content: Result<u64, String>) -> EmergencyRun {
        EmergencyRun {
            scope: EmergencyScope::Platform,
            triggered_at: chrono::Utc::now(),
            cancelled_bookings: bookings,
            secured_content: content,
        }
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(
            EmergencyScope::for_caller(&Caller::new(4, Role::Performer)),
            EmergencyScope::Performer(4)
        );
        assert_eq!(
            EmergencyScope::for_caller(&Caller::new(5, Role::SafetyOfficer)),
            EmergencyScope::Platform
        );
        assert_eq!(
            EmergencyScope::for_caller(&Caller::new(6, Role::Admin)),
            EmergencyScope::Platform
        );
    }

    #[test]
    fn counts_require_both_steps() {
        assert_eq!(run(Ok(2), Ok(3)).counts(), Some((2, 3)));
        assert_eq!(run(Err("db down".into()), Ok(3)).counts(), None);
        assert_eq!(run(Ok(2), Err("db down".into())).counts(), None);
    }

    #[test]
    fn failure_event_lists_every_error() {
        let actor = Caller::new(1, Role::SafetyOfficer);
        let event = run(Ok(2), Err("content update failed".into()))
            .failure_event(&actor, Some("audit append failed"));
        assert_eq!(event.action, actions::EMERGENCY_STOP_FAILED);
        assert_eq!(event.detail["cancelled_bookings"], 2);
        assert!(event.detail["secured_content"].is_null());
        assert_eq!(event.detail["errors"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn performer_scope_is_the_subject() {
        let actor = Caller::new(8, Role::Performer);
        let mut r = run(Ok(0), Ok(0));
        r.scope = EmergencyScope::Performer(8);
        let event = r.success_event(&actor, 0, 0);
        assert_eq!(event.subject_id, Some(8));
        assert_eq!(event.detail["scope"]["type"], "performer");
        assert_eq!(event.detail["scope"]["performer_id"], 8);
    }
}
