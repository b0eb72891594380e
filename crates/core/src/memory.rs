//! In-process [`ModerationStore`] backed by a single async mutex.
//!
//! Every method holds the lock for its whole body, so each call is
//! linearizable and all-or-nothing. The audit event is appended before any
//! row is written; a failed append leaves the state untouched. Used by tests and by `STORE_BACKEND=memory`
//! local runs; state is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::audit::{AuditEvent, NewAuditEvent};
use crate::booking::Booking;
use crate::consent::{evaluate_review, ConsentRecord, ReviewDecision};
use crate::content::{check_submit, Content, ContentWithConsent, CreateContent};
use crate::emergency::EmergencyScope;
use crate::error::CoreError;
use crate::identity::Caller;
use crate::status::{BookingStatus, ContentStatus};
use crate::store::ModerationStore;
use crate::types::DbId;

#[derive(Debug, Default)]
struct MemoryState {
    content: BTreeMap<DbId, Content>,
    consent: BTreeMap<DbId, ConsentRecord>,
    bookings: BTreeMap<DbId, Booking>,
    audit: Vec<AuditEvent>,
    next_content_id: DbId,
    next_booking_id: DbId,
    #[cfg(test)]
    audit_outage: bool,
}

impl MemoryState {
    fn push_audit(&mut self, event: &NewAuditEvent) -> Result<AuditEvent, CoreError> {
        #[cfg(test)]
        if self.audit_outage {
            return Err(CoreError::Storage("audit log unavailable".into()));
        }
        let stored = AuditEvent {
            id: self.audit.len() as DbId + 1,
            actor_id: event.actor_id,
            action: event.action.to_string(),
            subject_type: event.subject_type.to_string(),
            subject_id: event.subject_id,
            detail: event.detail.clone(),
            created_at: chrono::Utc::now(),
        };
        self.audit.push(stored.clone());
        Ok(stored)
    }

    fn pair(&self, content_id: DbId) -> Result<(Content, ConsentRecord), CoreError> {
        let content = self
            .content
            .get(&content_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Content",
                id: content_id,
            })?;
        let consent = self.consent.get(&content_id).cloned().ok_or_else(|| {
            CoreError::Internal(format!("Content {content_id} has no consent record"))
        })?;
        Ok((content, consent))
    }
}

/// Volatile store for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the whole audit log in append order.
    pub async fn audit_log(&self) -> Vec<AuditEvent> {
        self.state.lock().await.audit.clone()
    }
}

#[async_trait]
impl ModerationStore for InMemoryStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn create_content(
        &self,
        owner: &Caller,
        input: &CreateContent,
    ) -> Result<ContentWithConsent, CoreError> {
        let mut state = self.state.lock().await;
        state.next_content_id += 1;
        let id = state.next_content_id;
        let now = chrono::Utc::now();

        let content = Content {
            id,
            owner_id: owner.id,
            title: input.title.clone(),
            description: input.description.clone(),
            tags: input.tags.clone(),
            price_cents: input.price_cents,
            status: ContentStatus::Draft,
            version: 1,
            secured_at: None,
            created_at: now,
            updated_at: now,
        };
        let consent = ConsentRecord::empty(id);

        state.push_audit(&NewAuditEvent::content_created(owner, id, &content.title))?;
        state.content.insert(id, content.clone());
        state.consent.insert(id, consent.clone());

        Ok(ContentWithConsent { content, consent })
    }

    async fn submit_for_review(
        &self,
        content_id: DbId,
        caller: &Caller,
    ) -> Result<ContentWithConsent, CoreError> {
        let mut state = self.state.lock().await;
        let (mut content, mut consent) = state.pair(content_id)?;
        check_submit(&content, caller)?;
        content.status.check_transition(ContentStatus::Review)?;

        let now = chrono::Utc::now();
        content.status = ContentStatus::Review;
        content.version += 1;
        content.updated_at = now;
        consent.performer_approved = true;
        consent.signed_at = Some(now);

        state.push_audit(&NewAuditEvent::content_submitted(caller, content_id))?;
        state.content.insert(content_id, content.clone());
        state.consent.insert(content_id, consent.clone());

        Ok(ContentWithConsent { content, consent })
    }

    async fn apply_review(
        &self,
        content_id: DbId,
        caller: &Caller,
        decision: &ReviewDecision,
    ) -> Result<ContentWithConsent, CoreError> {
        let mut state = self.state.lock().await;
        let (mut content, consent) = state.pair(content_id)?;
        let transition = evaluate_review(content_id, content.status, &consent, decision)?;

        if !transition.changed {
            return Ok(ContentWithConsent {
                content,
                consent: transition.consent,
            });
        }

        content.status.check_transition(transition.status)?;
        content.status = transition.status;
        content.version += 1;
        content.updated_at = chrono::Utc::now();

        state.push_audit(&NewAuditEvent::content_reviewed(
            caller, content_id, decision, &transition,
        ))?;
        state.content.insert(content_id, content.clone());
        state.consent.insert(content_id, transition.consent.clone());

        Ok(ContentWithConsent {
            content,
            consent: transition.consent,
        })
    }

    async fn create_booking(
        &self,
        client: &Caller,
        performer_id: DbId,
    ) -> Result<Booking, CoreError> {
        let mut state = self.state.lock().await;
        state.next_booking_id += 1;
        let now = chrono::Utc::now();
        let booking = Booking {
            id: state.next_booking_id,
            client_id: client.id,
            performer_id,
            status: BookingStatus::Requested,
            created_at: now,
            updated_at: now,
        };
        state.push_audit(&NewAuditEvent::booking_created(client, booking.id, performer_id))?;
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn cancel_in_flight_bookings(&self, scope: EmergencyScope) -> Result<u64, CoreError> {
        let mut state = self.state.lock().await;
        let now = chrono::Utc::now();
        let mut affected = 0;
        for booking in state.bookings.values_mut() {
            if scope.covers(booking.performer_id) && booking.status.is_in_flight() {
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn secure_content_in_review(&self, scope: EmergencyScope) -> Result<u64, CoreError> {
        let mut state = self.state.lock().await;
        let now = chrono::Utc::now();
        let mut affected = 0;
        for content in state.content.values_mut() {
            if scope.covers(content.owner_id) && content.status == ContentStatus::Review {
                content.version += 1;
                content.secured_at = Some(now);
                content.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn append_audit(&self, event: &NewAuditEvent) -> Result<AuditEvent, CoreError> {
        self.state.lock().await.push_audit(event)
    }

    async fn get_content(&self, content_id: DbId) -> Result<Option<Content>, CoreError> {
        Ok(self.state.lock().await.content.get(&content_id).cloned())
    }

    async fn get_consent(&self, content_id: DbId) -> Result<Option<ConsentRecord>, CoreError> {
        Ok(self.state.lock().await.consent.get(&content_id).cloned())
    }

    async fn get_booking(&self, booking_id: DbId) -> Result<Option<Booking>, CoreError> {
        Ok(self.state.lock().await.bookings.get(&booking_id).cloned())
    }

    async fn list_audit_for_subject(
        &self,
        subject_type: &str,
        subject_id: DbId,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        let state = self.state.lock().await;
        Ok(state
            .audit
            .iter()
            .filter(|e| e.subject_type == subject_type && e.subject_id == Some(subject_id))
            .cloned()
            .collect())
    }

    async fn list_content_by_status(
        &self,
        status: ContentStatus,
        limit: i64,
    ) -> Result<Vec<Content>, CoreError> {
        let state = self.state.lock().await;
        let mut items: Vec<Content> = state
            .content
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect();
        items.sort_by_key(|c| (c.created_at, c.id));
        items.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(items)
    }
}
