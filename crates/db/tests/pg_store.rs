//! Integration tests for the PostgreSQL moderation store.
//!
//! Each test gets a fresh migrated database from `sqlx::test`, which reads
//! `DATABASE_URL`.

use std::sync::Arc;

use assert_matches::assert_matches;
use consentry_core::audit::{actions, subjects};
use consentry_core::consent::{ApprovalKind, ReviewDecision};
use consentry_core::content::CreateContent;
use consentry_core::emergency::EmergencyScope;
use consentry_core::error::CoreError;
use consentry_core::identity::Caller;
use consentry_core::roles::Role;
use consentry_core::status::{BookingStatus, ContentStatus};
use consentry_core::store::ModerationStore;
use consentry_db::repositories::BookingRepo;
use consentry_db::PgModerationStore;
use sqlx::PgPool;

const PERFORMER: Caller = Caller {
    id: 10,
    role: Role::Performer,
};
const SAFETY: Caller = Caller {
    id: 20,
    role: Role::SafetyOfficer,
};
const MODERATOR: Caller = Caller {
    id: 30,
    role: Role::Moderator,
};
const CLIENT: Caller = Caller {
    id: 50,
    role: Role::Client,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn metadata(title: &str) -> CreateContent {
    CreateContent {
        title: title.to_string(),
        description: Some("set list".to_string()),
        tags: vec!["live".to_string()],
        price_cents: Some(1500),
    }
}

async fn submitted(store: &PgModerationStore) -> i64 {
    let created = store
        .create_content(&PERFORMER, &metadata("Evening show"))
        .await
        .unwrap();
    store
        .submit_for_review(created.content.id, &PERFORMER)
        .await
        .unwrap();
    created.content.id
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_content_persists_draft_and_empty_consent(pool: PgPool) {
    let store = PgModerationStore::new(pool);
    let created = store
        .create_content(&PERFORMER, &metadata("Evening show"))
        .await
        .unwrap();

    assert_eq!(created.content.status, ContentStatus::Draft);
    assert_eq!(created.content.tags, vec!["live".to_string()]);
    assert!(!created.consent.performer_approved);

    let trail = store
        .list_audit_for_subject(subjects::CONTENT, created.content.id)
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, actions::CONTENT_CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dual_approval_promotes_in_one_transaction(pool: PgPool) {
    let store = PgModerationStore::new(pool);
    let id = submitted(&store).await;

    let after_safety = store
        .apply_review(id, &SAFETY, &ReviewDecision::approve(ApprovalKind::Safety))
        .await
        .unwrap();
    assert_eq!(after_safety.content.status, ContentStatus::Review);

    let after_moderation = store
        .apply_review(
            id,
            &MODERATOR,
            &ReviewDecision::approve(ApprovalKind::Moderation),
        )
        .await
        .unwrap();
    assert_eq!(after_moderation.content.status, ContentStatus::Approved);
    assert!(after_moderation.consent.is_fully_reviewed());

    let actions: Vec<String> = store
        .list_audit_for_subject(subjects::CONTENT, id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            actions::CONTENT_CREATED,
            actions::CONTENT_SUBMITTED_FOR_REVIEW,
            actions::CONTENT_APPROVED,
            actions::CONTENT_APPROVED,
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refused_review_leaves_no_trace(pool: PgPool) {
    let store = PgModerationStore::new(pool);
    let created = store
        .create_content(&PERFORMER, &metadata("Draft only"))
        .await
        .unwrap();

    let result = store
        .apply_review(
            created.content.id,
            &SAFETY,
            &ReviewDecision::approve(ApprovalKind::Safety),
        )
        .await;
    assert_matches!(result, Err(CoreError::InvalidState(_)));

    let consent = store.get_consent(created.content.id).await.unwrap().unwrap();
    assert!(!consent.safety_approved);
    let trail = store
        .list_audit_for_subject(subjects::CONTENT, created.content.id)
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_audit_append_rolls_back_review(pool: PgPool) {
    let store = PgModerationStore::new(pool.clone());
    let id = submitted(&store).await;
    store
        .apply_review(id, &SAFETY, &ReviewDecision::approve(ApprovalKind::Safety))
        .await
        .unwrap();

    sqlx::query(
        "CREATE TRIGGER trg_audit_events_outage BEFORE INSERT ON audit_events \
         FOR EACH ROW EXECUTE FUNCTION audit_events_reject_mutation()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = store
        .apply_review(
            id,
            &MODERATOR,
            &ReviewDecision::approve(ApprovalKind::Moderation),
        )
        .await;
    assert_matches!(result, Err(CoreError::Storage(_)));

    let content = store.get_content(id).await.unwrap().unwrap();
    assert_eq!(content.status, ContentStatus::Review);
    assert_eq!(content.version, 3);
    let consent = store.get_consent(id).await.unwrap().unwrap();
    assert!(consent.safety_approved);
    assert!(!consent.moderator_approved);

    let trail = store.list_audit_for_subject(subjects::CONTENT, id).await.unwrap();
    assert_eq!(trail.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_content_is_not_found(pool: PgPool) {
    let store = PgModerationStore::new(pool);
    let result = store.submit_for_review(9_999, &PERFORMER).await;
    assert_matches!(result, Err(CoreError::NotFound { id: 9_999, .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_final_approvals_promote_once(pool: PgPool) {
    let store = Arc::new(PgModerationStore::new(pool));
    let id = submitted(&store).await;

    let safety = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .apply_review(id, &SAFETY, &ReviewDecision::approve(ApprovalKind::Safety))
                .await
        })
    };
    let moderation = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .apply_review(
                    id,
                    &MODERATOR,
                    &ReviewDecision::approve(ApprovalKind::Moderation),
                )
                .await
        })
    };
    let results = futures::future::join_all([safety, moderation]).await;
    for result in results {
        result.unwrap().unwrap();
    }

    let content = store.get_content(id).await.unwrap().unwrap();
    assert_eq!(content.status, ContentStatus::Approved);

    let promotions = store
        .list_audit_for_subject(subjects::CONTENT, id)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.detail["promoted"] == true)
        .count();
    assert_eq!(promotions, 1);
}

// ---------------------------------------------------------------------------
// Emergency stop
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_emergency_bulk_updates(pool: PgPool) {
    let store = PgModerationStore::new(pool.clone());
    let requested = store.create_booking(&CLIENT, PERFORMER.id).await.unwrap();
    let confirmed = store.create_booking(&CLIENT, PERFORMER.id).await.unwrap();
    let completed = store.create_booking(&CLIENT, PERFORMER.id).await.unwrap();
    BookingRepo::set_status(&pool, confirmed.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    BookingRepo::set_status(&pool, completed.id, BookingStatus::Completed)
        .await
        .unwrap();
    let in_review = submitted(&store).await;

    let cancelled = store
        .cancel_in_flight_bookings(EmergencyScope::Platform)
        .await
        .unwrap();
    let secured = store
        .secure_content_in_review(EmergencyScope::Platform)
        .await
        .unwrap();
    assert_eq!((cancelled, secured), (2, 1));

    let requested = store.get_booking(requested.id).await.unwrap().unwrap();
    let completed = store.get_booking(completed.id).await.unwrap().unwrap();
    assert_eq!(requested.status, BookingStatus::Cancelled);
    assert_eq!(completed.status, BookingStatus::Completed);

    let content = store.get_content(in_review).await.unwrap().unwrap();
    assert_eq!(content.status, ContentStatus::Review);
    assert_eq!(content.version, 3);
    assert!(content.secured_at.is_some());

    // Second run touches no bookings.
    let again = store
        .cancel_in_flight_bookings(EmergencyScope::Platform)
        .await
        .unwrap();
    assert_eq!(again, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_performer_scope_only_touches_own_rows(pool: PgPool) {
    let store = PgModerationStore::new(pool);
    let own = store.create_booking(&CLIENT, PERFORMER.id).await.unwrap();
    let other = store.create_booking(&CLIENT, 11).await.unwrap();

    let cancelled = store
        .cancel_in_flight_bookings(EmergencyScope::Performer(PERFORMER.id))
        .await
        .unwrap();
    assert_eq!(cancelled, 1);

    let own = store.get_booking(own.id).await.unwrap().unwrap();
    let other = store.get_booking(other.id).await.unwrap().unwrap();
    assert_eq!(own.status, BookingStatus::Cancelled);
    assert_eq!(other.status, BookingStatus::Requested);
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_audit_rows_cannot_be_modified(pool: PgPool) {
    let store = PgModerationStore::new(pool.clone());
    store
        .create_content(&PERFORMER, &metadata("Immutable"))
        .await
        .unwrap();

    let update = sqlx::query("UPDATE audit_events SET action = 'tampered'")
        .execute(&pool)
        .await;
    assert!(update.is_err());

    let delete = sqlx::query("DELETE FROM audit_events").execute(&pool).await;
    assert!(delete.is_err());
}
