//! Repository for the `bookings` table.

use consentry_core::status::{BookingStatus, StatusId, IN_FLIGHT_BOOKING_STATUSES};
use consentry_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::booking::BookingRow;

const COLUMNS: &str = "id, client_id, performer_id, status_id, created_at, updated_at";

pub struct BookingRepo;

impl BookingRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
        performer_id: DbId,
    ) -> Result<BookingRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (client_id, performer_id, status_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(client_id)
            .bind(performer_id)
            .bind(BookingStatus::Requested.id())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<BookingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn set_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        status: BookingStatus,
    ) -> Result<Option<BookingRow>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status_id = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(executor)
            .await
    }

    /// Cancel every requested or confirmed booking, optionally only one
    /// performer's. Single statement, so each row flips atomically.
    pub async fn cancel_in_flight<'e>(
        executor: impl PgExecutor<'e>,
        performer_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let in_flight: Vec<StatusId> = IN_FLIGHT_BOOKING_STATUSES.iter().map(|s| s.id()).collect();
        let result = sqlx::query(
            "UPDATE bookings SET status_id = $1, updated_at = NOW()
             WHERE status_id = ANY($2) AND ($3::BIGINT IS NULL OR performer_id = $3)",
        )
        .bind(BookingStatus::Cancelled.id())
        .bind(&in_flight)
        .bind(performer_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
