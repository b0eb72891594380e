//! `bookings` table row.

use consentry_core::booking::Booking;
use consentry_core::error::CoreError;
use consentry_core::status::{BookingStatus, StatusId};
use consentry_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: DbId,
    pub client_id: DbId,
    pub performer_id: DbId,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<BookingRow> for Booking {
    type Error = CoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::from_id(row.status_id).ok_or_else(|| {
            CoreError::Internal(format!(
                "Booking {} has unknown status_id {}",
                row.id, row.status_id
            ))
        })?;
        Ok(Booking {
            id: row.id,
            client_id: row.client_id,
            performer_id: row.performer_id,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
