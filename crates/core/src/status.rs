//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table, and its name matches
//! the `name` column of that table.

use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID, `None` if it is not seeded.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Lookup-table name of this status.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Content moderation lifecycle status.
    ContentStatus {
        Draft = 1 => "draft",
        Review = 2 => "review",
        Approved = 3 => "approved",
        Rejected = 4 => "rejected",
    }
}

define_status_enum! {
    /// Booking lifecycle status.
    BookingStatus {
        Requested = 1 => "requested",
        Confirmed = 2 => "confirmed",
        Cancelled = 3 => "cancelled",
        Completed = 4 => "completed",
    }
}

impl ContentStatus {
    /// Terminal statuses never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ContentStatus::Approved | ContentStatus::Rejected)
    }

    /// Whether `self -> next` is an edge of `DRAFT -> REVIEW -> {APPROVED, REJECTED}`.
    ///
    /// `REVIEW -> REVIEW` is allowed: it is the emergency-stop checkpoint
    /// and the no-op write of a repeated approval.
    pub fn can_transition_to(self, next: ContentStatus) -> bool {
        matches!(
            (self, next),
            (ContentStatus::Draft, ContentStatus::Review)
                | (ContentStatus::Review, ContentStatus::Review)
                | (ContentStatus::Review, ContentStatus::Approved)
                | (ContentStatus::Review, ContentStatus::Rejected)
        )
    }

    /// Refuse any write that would break the monotonic lifecycle.
    pub fn check_transition(self, next: ContentStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::Internal(format!(
                "Illegal content transition {self} -> {next}"
            )))
        }
    }
}

/// Booking statuses an emergency stop cancels.
pub const IN_FLIGHT_BOOKING_STATUSES: &[BookingStatus] =
    &[BookingStatus::Requested, BookingStatus::Confirmed];

impl BookingStatus {
    /// Whether an emergency stop must cancel a booking in this status.
    pub fn is_in_flight(self) -> bool {
        IN_FLIGHT_BOOKING_STATUSES.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CONTENT: [ContentStatus; 4] = [
        ContentStatus::Draft,
        ContentStatus::Review,
        ContentStatus::Approved,
        ContentStatus::Rejected,
    ];

    #[test]
    fn content_status_ids_match_seed_order() {
        assert_eq!(ContentStatus::Draft.id(), 1);
        assert_eq!(ContentStatus::Review.id(), 2);
        assert_eq!(ContentStatus::Approved.id(), 3);
        assert_eq!(ContentStatus::Rejected.id(), 4);
    }

    #[test]
    fn from_id_inverts_id() {
        for status in ALL_CONTENT {
            assert_eq!(ContentStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(ContentStatus::from_id(0), None);
        assert_eq!(BookingStatus::from_id(9), None);
    }

    #[test]
    fn statuses_serialize_as_names() {
        let json = serde_json::to_value(ContentStatus::Review).unwrap();
        assert_eq!(json, "review");
        let json = serde_json::to_value(BookingStatus::Cancelled).unwrap();
        assert_eq!(json, "cancelled");
    }

    #[test]
    fn nothing_returns_to_draft() {
        for status in ALL_CONTENT {
            assert!(!status.can_transition_to(ContentStatus::Draft));
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for from in [ContentStatus::Approved, ContentStatus::Rejected] {
            assert!(from.is_terminal());
            for to in ALL_CONTENT {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }

    #[test]
    fn draft_only_moves_to_review() {
        assert!(ContentStatus::Draft.can_transition_to(ContentStatus::Review));
        assert!(!ContentStatus::Draft.can_transition_to(ContentStatus::Approved));
        assert!(!ContentStatus::Draft.can_transition_to(ContentStatus::Rejected));
    }

    #[test]
    fn check_transition_reports_internal_error() {
        assert!(ContentStatus::Review
            .check_transition(ContentStatus::Approved)
            .is_ok());
        let err = ContentStatus::Approved
            .check_transition(ContentStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal(msg) if msg.contains("approved -> rejected")));
    }

    #[test]
    fn only_requested_and_confirmed_are_in_flight() {
        assert!(BookingStatus::Requested.is_in_flight());
        assert!(BookingStatus::Confirmed.is_in_flight());
        assert!(!BookingStatus::Cancelled.is_in_flight());
        assert!(!BookingStatus::Completed.is_in_flight());
    }
}
