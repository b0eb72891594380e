//! Approval engine and emergency stop controller.
//!
//! The engine owns authorization (role capabilities) and orchestration.
//! State guards and the consent decision run inside the store's atomic
//! step; see [`ModerationStore`].

use std::sync::Arc;

use crate::audit::{subjects, AuditEvent};
use crate::booking::{Booking, CreateBooking};
use crate::consent::{ApprovalKind, ConsentRecord, ReviewDecision};
use crate::content::{Content, ContentWithConsent, CreateContent};
use crate::emergency::{EmergencyRun, EmergencyScope, EmergencyStopReport};
use crate::error::CoreError;
use crate::identity::Caller;
use crate::roles::{Capability, Role};
use crate::status::ContentStatus;
use crate::store::ModerationStore;
use crate::types::DbId;

/// Default page size for the moderation queue.
pub const DEFAULT_QUEUE_LIMIT: i64 = 50;

/// Hard cap on the moderation queue page size.
pub const MAX_QUEUE_LIMIT: i64 = 500;

/// Drives content through `DRAFT -> REVIEW -> {APPROVED, REJECTED}` and
/// runs emergency stops. Cheap to clone.
#[derive(Clone)]
pub struct ModerationEngine {
    store: Arc<dyn ModerationStore>,
}

impl ModerationEngine {
    pub fn new(store: Arc<dyn ModerationStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ModerationStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Create a draft and its empty consent record.
    pub async fn create_content(
        &self,
        caller: &Caller,
        input: &CreateContent,
    ) -> Result<ContentWithConsent, CoreError> {
        caller.role.require(Capability::CreateContent)?;
        input.validate()?;

        let created = self.store.create_content(caller, input).await?;
        tracing::info!(
            content_id = created.content.id,
            owner_id = caller.id,
            "Content created"
        );
        Ok(created)
    }

    /// Owner submits a draft for review, recording performer consent.
    pub async fn submit_for_review(
        &self,
        caller: &Caller,
        content_id: DbId,
    ) -> Result<ContentWithConsent, CoreError> {
        caller.role.require(Capability::SubmitContent)?;

        let submitted = self
            .store
            .submit_for_review(content_id, caller)
            .await
            .inspect_err(|e| log_rejected("submit", content_id, caller, e))?;

        tracing::info!(content_id, owner_id = caller.id, "Content submitted for review");
        Ok(submitted)
    }

    /// Record one reviewer's approval. Promotes to `APPROVED` once both
    /// the safety and moderation flags are set.
    pub async fn approve(
        &self,
        caller: &Caller,
        content_id: DbId,
        kind: ApprovalKind,
    ) -> Result<ContentWithConsent, CoreError> {
        self.review(caller, content_id, ReviewDecision::approve(kind))
            .await
    }

    /// Record one reviewer's rejection. Terminal immediately.
    pub async fn reject(
        &self,
        caller: &Caller,
        content_id: DbId,
        kind: ApprovalKind,
        reason: Option<String>,
    ) -> Result<ContentWithConsent, CoreError> {
        self.review(caller, content_id, ReviewDecision::reject(kind, reason))
            .await
    }

    async fn review(
        &self,
        caller: &Caller,
        content_id: DbId,
        decision: ReviewDecision,
    ) -> Result<ContentWithConsent, CoreError> {
        caller.role.require(decision.kind.capability())?;

        let reviewed = self
            .store
            .apply_review(content_id, caller, &decision)
            .await
            .inspect_err(|e| log_rejected("review", content_id, caller, e))?;

        tracing::info!(
            content_id,
            user_id = caller.id,
            role = %caller.role,
            kind = %decision.kind,
            verdict = ?decision.verdict,
            status = %reviewed.content.status,
            "Review recorded"
        );
        Ok(reviewed)
    }

    // -----------------------------------------------------------------------
    // Emergency stop
    // -----------------------------------------------------------------------

    /// Cancel in-flight bookings and checkpoint in-review content.
    ///
    /// Both bulk steps are always attempted. If either step, or the success
    /// audit append, fails, an `emergency_stop_failed` event is appended on
    /// a best-effort basis and [`CoreError::EmergencyStopPartialFailure`]
    /// is returned; committed steps are not rolled back.
    ///
    /// The run is spawned onto its own task, so dropping the returned future
    /// (request timeout, client disconnect) does not stop it before the
    /// audit event is written.
    pub async fn emergency_stop(&self, caller: &Caller) -> Result<EmergencyStopReport, CoreError> {
        caller.role.require(Capability::EmergencyStop)?;

        let engine = self.clone();
        let caller = *caller;
        tokio::spawn(async move { engine.run_emergency_stop(&caller).await })
            .await
            .map_err(|e| CoreError::Internal(format!("Emergency stop task failed: {e}")))?
    }

    async fn run_emergency_stop(&self, caller: &Caller) -> Result<EmergencyStopReport, CoreError> {
        let scope = EmergencyScope::for_caller(caller);
        tracing::warn!(user_id = caller.id, role = %caller.role, ?scope, "Emergency stop triggered");

        let cancelled_bookings = self
            .store
            .cancel_in_flight_bookings(scope)
            .await
            .map_err(|e| e.to_string());
        let secured_content = self
            .store
            .secure_content_in_review(scope)
            .await
            .map_err(|e| e.to_string());

        let run = EmergencyRun {
            scope,
            triggered_at: chrono::Utc::now(),
            cancelled_bookings,
            secured_content,
        };

        let append_error = match run.counts() {
            Some((cancelled, secured)) => {
                let event = run.success_event(caller, cancelled, secured);
                match self.store.append_audit(&event).await {
                    Ok(stored) => {
                        tracing::warn!(
                            user_id = caller.id,
                            cancelled_bookings = cancelled,
                            secured_content = secured,
                            audit_event_id = stored.id,
                            "Emergency stop completed"
                        );
                        return Ok(EmergencyStopReport {
                            scope,
                            cancelled_bookings: cancelled,
                            secured_content: secured,
                            audit_event_id: stored.id,
                            triggered_at: run.triggered_at,
                        });
                    }
                    Err(e) => Some(e.to_string()),
                }
            }
            None => None,
        };

        Err(self.record_emergency_failure(caller, &run, append_error).await)
    }

    async fn record_emergency_failure(
        &self,
        caller: &Caller,
        run: &EmergencyRun,
        append_error: Option<String>,
    ) -> CoreError {
        tracing::error!(
            user_id = caller.id,
            cancelled_bookings = ?run.cancelled_bookings,
            secured_content = ?run.secured_content,
            append_error = ?append_error,
            "Emergency stop partially failed"
        );

        let event = run.failure_event(caller, append_error.as_deref());
        if let Err(e) = self.store.append_audit(&event).await {
            tracing::error!(
                error = %e,
                user_id = caller.id,
                "Failed to record emergency stop failure; operator intervention required"
            );
        }

        CoreError::EmergencyStopPartialFailure {
            cancelled_bookings: run.cancelled_bookings.as_ref().ok().copied(),
            secured_content: run.secured_content.as_ref().ok().copied(),
            message: "Emergency stop partially failed; contact an operator".into(),
        }
    }

    // -----------------------------------------------------------------------
    // Bookings
    // -----------------------------------------------------------------------

    pub async fn create_booking(
        &self,
        caller: &Caller,
        input: &CreateBooking,
    ) -> Result<Booking, CoreError> {
        caller.role.require(Capability::CreateBooking)?;
        if input.performer_id == caller.id {
            return Err(CoreError::Validation("Cannot book yourself".into()));
        }

        let booking = self.store.create_booking(caller, input.performer_id).await?;
        tracing::info!(
            booking_id = booking.id,
            client_id = caller.id,
            performer_id = input.performer_id,
            "Booking requested"
        );
        Ok(booking)
    }

    /// Visible to the booking's client and performer, safety officers, and admins.
    pub async fn get_booking(&self, caller: &Caller, booking_id: DbId) -> Result<Booking, CoreError> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Booking",
                id: booking_id,
            })?;

        let party = booking.client_id == caller.id || booking.performer_id == caller.id;
        if party || matches!(caller.role, Role::Admin | Role::SafetyOfficer) {
            Ok(booking)
        } else {
            Err(CoreError::Forbidden("Not a party to this booking".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// Content is visible to its owner, to reviewers, and to anyone once approved.
    pub async fn get_content(&self, caller: &Caller, content_id: DbId) -> Result<Content, CoreError> {
        let content = self
            .store
            .get_content(content_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Content",
                id: content_id,
            })?;
        ensure_can_view(caller, &content)?;
        Ok(content)
    }

    pub async fn get_consent(
        &self,
        caller: &Caller,
        content_id: DbId,
    ) -> Result<ConsentRecord, CoreError> {
        self.get_content(caller, content_id).await?;
        self.store
            .get_consent(content_id)
            .await?
            .ok_or_else(|| CoreError::Internal(format!("Content {content_id} has no consent record")))
    }

    /// Audit events for one content item, in append order.
    pub async fn audit_trail(
        &self,
        caller: &Caller,
        content_id: DbId,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        caller.role.require(Capability::ViewAuditTrail)?;
        if self.store.get_content(content_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Content",
                id: content_id,
            });
        }
        self.store
            .list_audit_for_subject(subjects::CONTENT, content_id)
            .await
    }

    /// Content awaiting review, oldest first.
    pub async fn moderation_queue(
        &self,
        caller: &Caller,
        limit: Option<i64>,
    ) -> Result<Vec<Content>, CoreError> {
        caller.role.require(Capability::ViewModerationQueue)?;
        let limit = limit.unwrap_or(DEFAULT_QUEUE_LIMIT).clamp(1, MAX_QUEUE_LIMIT);
        self.store
            .list_content_by_status(ContentStatus::Review, limit)
            .await
    }
}

fn ensure_can_view(caller: &Caller, content: &Content) -> Result<(), CoreError> {
    if content.owner_id == caller.id
        || content.status == ContentStatus::Approved
        || caller.role.can(Capability::ViewModerationQueue)
    {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Content is not visible to this caller".into()))
    }
}

fn log_rejected(action: &'static str, content_id: DbId, caller: &Caller, err: &CoreError) {
    match err {
        CoreError::Storage(_) | CoreError::Internal(_) => {
            tracing::error!(action, content_id, user_id = caller.id, error = %err, "Transition failed");
        }
        _ => {
            tracing::info!(action, content_id, user_id = caller.id, error = %err, "Transition refused");
        }
    }
}
