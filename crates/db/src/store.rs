//! Transactional [`ModerationStore`] over PostgreSQL.
//!
//! Every mutating operation runs in one transaction: the content row is
//! locked with `SELECT ... FOR UPDATE`, the shared guard runs against the
//! locked state, and the row writes plus the audit append commit together.
//! Dropping the transaction on any early return rolls everything back.

use async_trait::async_trait;
use consentry_core::audit::{AuditEvent, NewAuditEvent};
use consentry_core::booking::Booking;
use consentry_core::consent::{evaluate_review, ConsentRecord, ReviewDecision};
use consentry_core::content::{check_submit, Content, ContentWithConsent, CreateContent};
use consentry_core::emergency::EmergencyScope;
use consentry_core::error::CoreError;
use consentry_core::identity::Caller;
use consentry_core::status::ContentStatus;
use consentry_core::store::ModerationStore;
use consentry_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::repositories::{AuditEventRepo, BookingRepo, ConsentRepo, ContentRepo};
use crate::storage_error;

/// PostgreSQL-backed moderation store.
#[derive(Debug, Clone)]
pub struct PgModerationStore {
    pool: PgPool,
}

impl PgModerationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Lock a content row and load its consent record inside `conn`'s transaction.
async fn lock_pair(
    conn: &mut PgConnection,
    content_id: DbId,
) -> Result<(Content, ConsentRecord), CoreError> {
    let content: Content = ContentRepo::lock_for_update(&mut *conn, content_id)
        .await
        .map_err(storage_error)?
        .ok_or(CoreError::NotFound {
            entity: "Content",
            id: content_id,
        })?
        .try_into()?;
    let consent = ConsentRepo::find(&mut *conn, content_id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| CoreError::Internal(format!("Content {content_id} has no consent record")))?
        .into();
    Ok((content, consent))
}

#[async_trait]
impl ModerationStore for PgModerationStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(storage_error)
    }

    async fn create_content(
        &self,
        owner: &Caller,
        input: &CreateContent,
    ) -> Result<ContentWithConsent, CoreError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let content: Content = ContentRepo::create(&mut *tx, owner.id, input)
            .await
            .map_err(storage_error)?
            .try_into()?;
        let consent: ConsentRecord = ConsentRepo::create_empty(&mut *tx, content.id)
            .await
            .map_err(storage_error)?
            .into();
        AuditEventRepo::append(
            &mut *tx,
            &NewAuditEvent::content_created(owner, content.id, &content.title),
        )
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(ContentWithConsent { content, consent })
    }

    async fn submit_for_review(
        &self,
        content_id: DbId,
        caller: &Caller,
    ) -> Result<ContentWithConsent, CoreError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let (content, _) = lock_pair(&mut *tx, content_id).await?;
        check_submit(&content, caller)?;
        content.status.check_transition(ContentStatus::Review)?;

        let content: Content = ContentRepo::set_status(&mut *tx, content_id, ContentStatus::Review)
            .await
            .map_err(storage_error)?
            .try_into()?;
        let consent: ConsentRecord = ConsentRepo::mark_performer_signed(&mut *tx, content_id)
            .await
            .map_err(storage_error)?
            .into();
        AuditEventRepo::append(&mut *tx, &NewAuditEvent::content_submitted(caller, content_id))
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(ContentWithConsent { content, consent })
    }

    async fn apply_review(
        &self,
        content_id: DbId,
        caller: &Caller,
        decision: &ReviewDecision,
    ) -> Result<ContentWithConsent, CoreError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let (content, consent) = lock_pair(&mut *tx, content_id).await?;
        let transition = evaluate_review(content_id, content.status, &consent, decision)?;

        if !transition.changed {
            // Nothing to write; releasing the lock is all that is left.
            tx.rollback().await.map_err(storage_error)?;
            return Ok(ContentWithConsent {
                content,
                consent: transition.consent,
            });
        }

        content.status.check_transition(transition.status)?;
        let consent: ConsentRecord = ConsentRepo::set_reviewer_flags(
            &mut *tx,
            content_id,
            transition.consent.safety_approved,
            transition.consent.moderator_approved,
        )
        .await
        .map_err(storage_error)?
        .into();
        let content: Content = ContentRepo::set_status(&mut *tx, content_id, transition.status)
            .await
            .map_err(storage_error)?
            .try_into()?;
        AuditEventRepo::append(
            &mut *tx,
            &NewAuditEvent::content_reviewed(caller, content_id, decision, &transition),
        )
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(ContentWithConsent { content, consent })
    }

    async fn create_booking(
        &self,
        client: &Caller,
        performer_id: DbId,
    ) -> Result<Booking, CoreError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let booking: Booking = BookingRepo::create(&mut *tx, client.id, performer_id)
            .await
            .map_err(storage_error)?
            .try_into()?;
        AuditEventRepo::append(
            &mut *tx,
            &NewAuditEvent::booking_created(client, booking.id, performer_id),
        )
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(booking)
    }

    async fn cancel_in_flight_bookings(&self, scope: EmergencyScope) -> Result<u64, CoreError> {
        BookingRepo::cancel_in_flight(&self.pool, scope.performer_id())
            .await
            .map_err(storage_error)
    }

    async fn secure_content_in_review(&self, scope: EmergencyScope) -> Result<u64, CoreError> {
        ContentRepo::secure_in_review(&self.pool, scope.performer_id())
            .await
            .map_err(storage_error)
    }

    async fn append_audit(&self, event: &NewAuditEvent) -> Result<AuditEvent, CoreError> {
        AuditEventRepo::append(&self.pool, event)
            .await
            .map(AuditEvent::from)
            .map_err(storage_error)
    }

    async fn get_content(&self, content_id: DbId) -> Result<Option<Content>, CoreError> {
        ContentRepo::find_by_id(&self.pool, content_id)
            .await
            .map_err(storage_error)?
            .map(Content::try_from)
            .transpose()
    }

    async fn get_consent(&self, content_id: DbId) -> Result<Option<ConsentRecord>, CoreError> {
        Ok(ConsentRepo::find(&self.pool, content_id)
            .await
            .map_err(storage_error)?
            .map(ConsentRecord::from))
    }

    async fn get_booking(&self, booking_id: DbId) -> Result<Option<Booking>, CoreError> {
        BookingRepo::find_by_id(&self.pool, booking_id)
            .await
            .map_err(storage_error)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn list_audit_for_subject(
        &self,
        subject_type: &str,
        subject_id: DbId,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        let rows = AuditEventRepo::list_for_subject(&self.pool, subject_type, subject_id)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(AuditEvent::from).collect())
    }

    async fn list_content_by_status(
        &self,
        status: ContentStatus,
        limit: i64,
    ) -> Result<Vec<Content>, CoreError> {
        ContentRepo::list_by_status(&self.pool, status, limit)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(Content::try_from)
            .collect()
    }
}
