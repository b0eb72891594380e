//! Bookings: the in-flight operations an emergency stop cancels.

use serde::{Deserialize, Serialize};

use crate::status::BookingStatus;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub client_id: DbId,
    pub performer_id: DbId,
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a booking with a performer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub performer_id: DbId,
}
