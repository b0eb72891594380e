//! `consent_records` table row.

use consentry_core::consent::ConsentRecord;
use consentry_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ConsentRow {
    pub content_id: DbId,
    pub performer_approved: bool,
    pub safety_approved: bool,
    pub moderator_approved: bool,
    pub signed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl From<ConsentRow> for ConsentRecord {
    fn from(row: ConsentRow) -> Self {
        ConsentRecord {
            content_id: row.content_id,
            performer_approved: row.performer_approved,
            safety_approved: row.safety_approved,
            moderator_approved: row.moderator_approved,
            signed_at: row.signed_at,
        }
    }
}
