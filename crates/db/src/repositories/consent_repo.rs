//! Repository for the `consent_records` table.

use consentry_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::consent::ConsentRow;

const COLUMNS: &str =
    "content_id, performer_approved, safety_approved, moderator_approved, signed_at, updated_at";

pub struct ConsentRepo;

impl ConsentRepo {
    /// Insert the empty record that accompanies a new draft.
    pub async fn create_empty<'e>(
        executor: impl PgExecutor<'e>,
        content_id: DbId,
    ) -> Result<ConsentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO consent_records (content_id) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConsentRow>(&query)
            .bind(content_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find<'e>(
        executor: impl PgExecutor<'e>,
        content_id: DbId,
    ) -> Result<Option<ConsentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM consent_records WHERE content_id = $1");
        sqlx::query_as::<_, ConsentRow>(&query)
            .bind(content_id)
            .fetch_optional(executor)
            .await
    }

    /// Record the performer's own consent at submission time.
    pub async fn mark_performer_signed<'e>(
        executor: impl PgExecutor<'e>,
        content_id: DbId,
    ) -> Result<ConsentRow, sqlx::Error> {
        let query = format!(
            "UPDATE consent_records
             SET performer_approved = TRUE, signed_at = NOW(), updated_at = NOW()
             WHERE content_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConsentRow>(&query)
            .bind(content_id)
            .fetch_one(executor)
            .await
    }

    /// Overwrite both reviewer flags with the values computed under lock.
    pub async fn set_reviewer_flags<'e>(
        executor: impl PgExecutor<'e>,
        content_id: DbId,
        safety_approved: bool,
        moderator_approved: bool,
    ) -> Result<ConsentRow, sqlx::Error> {
        let query = format!(
            "UPDATE consent_records
             SET safety_approved = $2, moderator_approved = $3, updated_at = NOW()
             WHERE content_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConsentRow>(&query)
            .bind(content_id)
            .bind(safety_approved)
            .bind(moderator_approved)
            .fetch_one(executor)
            .await
    }
}
