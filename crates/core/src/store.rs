//! Storage seam required by the moderation engine.
//!
//! Implementations must make every mutating method a single atomic unit:
//! the guard check, the row writes, and the audit append either all commit
//! or none do. Writes to one content item are serialized (row lock or
//! equivalent) so concurrent reviewers never both decide the final status.

use async_trait::async_trait;

use crate::audit::{AuditEvent, NewAuditEvent};
use crate::booking::Booking;
use crate::consent::{ConsentRecord, ReviewDecision};
use crate::content::{Content, ContentWithConsent, CreateContent};
use crate::emergency::EmergencyScope;
use crate::error::CoreError;
use crate::identity::Caller;
use crate::status::ContentStatus;
use crate::types::DbId;

/// Content, consent, booking, and audit persistence.
///
/// Errors other than guard failures are reported as
/// [`CoreError::Storage`] and imply a full rollback.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), CoreError>;

    /// Insert a draft and its empty consent record, plus a
    /// `content_created` event.
    async fn create_content(
        &self,
        owner: &Caller,
        input: &CreateContent,
    ) -> Result<ContentWithConsent, CoreError>;

    /// `DRAFT -> REVIEW` under lock, guarded by
    /// [`check_submit`](crate::content::check_submit); sets
    /// `performer_approved` and `signed_at` and appends
    /// `content_submitted_for_review`.
    async fn submit_for_review(
        &self,
        content_id: DbId,
        caller: &Caller,
    ) -> Result<ContentWithConsent, CoreError>;

    /// Apply a review decision under lock via
    /// [`evaluate_review`](crate::consent::evaluate_review). Writes and
    /// audits only when the transition changed something.
    async fn apply_review(
        &self,
        content_id: DbId,
        caller: &Caller,
        decision: &ReviewDecision,
    ) -> Result<ContentWithConsent, CoreError>;

    async fn create_booking(&self, client: &Caller, performer_id: DbId)
        -> Result<Booking, CoreError>;

    /// Cancel every `REQUESTED`/`CONFIRMED` booking in scope, returning the
    /// number of rows changed.
    async fn cancel_in_flight_bookings(&self, scope: EmergencyScope) -> Result<u64, CoreError>;

    /// Re-affirm every in-scope content item in `REVIEW`: status stays
    /// `REVIEW`, `version` is bumped and `secured_at` stamped. Returns the
    /// number of rows touched.
    async fn secure_content_in_review(&self, scope: EmergencyScope) -> Result<u64, CoreError>;

    /// Append a standalone audit event.
    async fn append_audit(&self, event: &NewAuditEvent) -> Result<AuditEvent, CoreError>;

    async fn get_content(&self, content_id: DbId) -> Result<Option<Content>, CoreError>;

    async fn get_consent(&self, content_id: DbId) -> Result<Option<ConsentRecord>, CoreError>;

    async fn get_booking(&self, booking_id: DbId) -> Result<Option<Booking>, CoreError>;

    /// Events for one subject in append order.
    async fn list_audit_for_subject(
        &self,
        subject_type: &str,
        subject_id: DbId,
    ) -> Result<Vec<AuditEvent>, CoreError>;

    /// Content in the given status, oldest first.
    async fn list_content_by_status(
        &self,
        status: ContentStatus,
        limit: i64,
    ) -> Result<Vec<Content>, CoreError>;
}
