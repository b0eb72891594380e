//! Repository for the `content` table.

use consentry_core::content::CreateContent;
use consentry_core::status::ContentStatus;
use consentry_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::content::ContentRow;

/// Column list for content queries.
const COLUMNS: &str = "id, owner_id, title, description, tags, price_cents, \
    status_id, version, secured_at, created_at, updated_at";

/// Provides queries for content rows.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert a new draft, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: DbId,
        input: &CreateContent,
    ) -> Result<ContentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO content (owner_id, title, description, tags, price_cents, status_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.tags)
            .bind(input.price_cents)
            .bind(ContentStatus::Draft.id())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ContentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content WHERE id = $1");
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Read a row and hold its lock until the surrounding transaction ends.
    ///
    /// All status writers go through this, so writes to one content item
    /// are serialized.
    pub async fn lock_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ContentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Set the status of a row previously locked by [`Self::lock_for_update`].
    pub async fn set_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        status: ContentStatus,
    ) -> Result<ContentRow, sqlx::Error> {
        let query = format!(
            "UPDATE content
             SET status_id = $2, version = version + 1, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(executor)
            .await
    }

    /// Checkpoint every in-review row, optionally only one owner's.
    ///
    /// Status is rewritten to `review` unchanged; `version` and
    /// `secured_at` record the checkpoint. Returns the number of rows.
    pub async fn secure_in_review<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content
             SET status_id = $1, version = version + 1, secured_at = NOW(), updated_at = NOW()
             WHERE status_id = $1 AND ($2::BIGINT IS NULL OR owner_id = $2)",
        )
        .bind(ContentStatus::Review.id())
        .bind(owner_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Rows in `status`, oldest first.
    pub async fn list_by_status<'e>(
        executor: impl PgExecutor<'e>,
        status: ContentStatus,
        limit: i64,
    ) -> Result<Vec<ContentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content
             WHERE status_id = $1
             ORDER BY created_at ASC, id ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, ContentRow>(&query)
            .bind(status.id())
            .bind(limit)
            .fetch_all(executor)
            .await
    }
}
