//! Audit event vocabulary and the append contract's payload types.
//!
//! Every state-changing action produces exactly one [`NewAuditEvent`], which
//! the store appends in the same transaction as the change it documents.
//! Appended events are never edited or removed.

use serde::Serialize;
use serde_json::{json, Value};

use crate::consent::{ApprovalKind, ReviewDecision, ReviewTransition, Verdict};
use crate::identity::Caller;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Action and subject constants
// ---------------------------------------------------------------------------

/// Known action kinds for audit events.
pub mod actions {
    pub const CONTENT_CREATED: &str = "content_created";
    pub const CONTENT_SUBMITTED_FOR_REVIEW: &str = "content_submitted_for_review";
    pub const CONTENT_APPROVED: &str = "content_approved";
    pub const CONTENT_REJECTED: &str = "content_rejected";
    pub const BOOKING_CREATED: &str = "booking_created";
    pub const EMERGENCY_STOP: &str = "emergency_stop";
    pub const EMERGENCY_STOP_FAILED: &str = "emergency_stop_failed";
}

/// Kinds of entity an audit event can be about.
pub mod subjects {
    pub const CONTENT: &str = "content";
    pub const BOOKING: &str = "booking";
    pub const PLATFORM: &str = "platform";
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A persisted, immutable audit event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    /// Monotonically increasing append sequence.
    pub id: DbId,
    pub actor_id: Option<DbId>,
    pub action: String,
    pub subject_type: String,
    pub subject_id: Option<DbId>,
    pub detail: Value,
    pub created_at: Timestamp,
}

/// An audit event waiting to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEvent {
    pub actor_id: Option<DbId>,
    pub action: &'static str,
    pub subject_type: &'static str,
    pub subject_id: Option<DbId>,
    pub detail: Value,
}

impl NewAuditEvent {
    /// Build an event with its detail payload already redacted.
    pub fn new(
        actor: &Caller,
        action: &'static str,
        subject_type: &'static str,
        subject_id: Option<DbId>,
        detail: Value,
    ) -> Self {
        Self {
            actor_id: Some(actor.id),
            action,
            subject_type,
            subject_id,
            detail: redact_sensitive_fields(&detail),
        }
    }

    pub fn content_created(actor: &Caller, content_id: DbId, title: &str) -> Self {
        Self::new(
            actor,
            actions::CONTENT_CREATED,
            subjects::CONTENT,
            Some(content_id),
            json!({ "title": title }),
        )
    }

    pub fn content_submitted(actor: &Caller, content_id: DbId) -> Self {
        Self::new(
            actor,
            actions::CONTENT_SUBMITTED_FOR_REVIEW,
            subjects::CONTENT,
            Some(content_id),
            json!({ "performer_approved": true }),
        )
    }

    /// Event documenting an applied review decision.
    pub fn content_reviewed(
        actor: &Caller,
        content_id: DbId,
        decision: &ReviewDecision,
        transition: &ReviewTransition,
    ) -> Self {
        let (action, detail) = match decision.verdict {
            Verdict::Approve => (
                actions::CONTENT_APPROVED,
                json!({
                    "kind": decision.kind,
                    "promoted": transition.promoted,
                    "status": transition.status,
                    "role": actor.role,
                }),
            ),
            Verdict::Reject => (
                actions::CONTENT_REJECTED,
                json!({
                    "kind": decision.kind,
                    "reason": decision.reason,
                    "status": transition.status,
                    "role": actor.role,
                }),
            ),
        };
        Self::new(actor, action, subjects::CONTENT, Some(content_id), detail)
    }

    pub fn booking_created(actor: &Caller, booking_id: DbId, performer_id: DbId) -> Self {
        Self::new(
            actor,
            actions::BOOKING_CREATED,
            subjects::BOOKING,
            Some(booking_id),
            json!({ "performer_id": performer_id }),
        )
    }
}

/// Whether an event records an approval of the given kind.
pub fn is_approval_of(event: &AuditEvent, kind: ApprovalKind) -> bool {
    event.action == actions::CONTENT_APPROVED && event.detail["kind"] == kind.as_str()
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Keys whose values never reach the audit log.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "authorization",
    "credential",
    "api_key",
];

/// Replace the value of any key containing a [`SENSITIVE_FIELDS`] entry
/// with `"[REDACTED]"`, recursing through objects and arrays.
pub fn redact_sensitive_fields(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lower = key.to_lowercase();
                    let val = if SENSITIVE_FIELDS.iter().any(|f| lower.contains(f)) {
                        Value::String("[REDACTED]".to_string())
                    } else {
                        redact_sensitive_fields(val)
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_fields).collect()),
        other => other.clone(),
    }
}
