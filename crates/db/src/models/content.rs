//! `content` table row.

use consentry_core::content::Content;
use consentry_core::error::CoreError;
use consentry_core::status::{ContentStatus, StatusId};
use consentry_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ContentRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub price_cents: Option<i64>,
    pub status_id: StatusId,
    pub version: i32,
    pub secured_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ContentRow> for Content {
    type Error = CoreError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let status = ContentStatus::from_id(row.status_id).ok_or_else(|| {
            CoreError::Internal(format!(
                "Content {} has unknown status_id {}",
                row.id, row.status_id
            ))
        })?;
        Ok(Content {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            tags: row.tags,
            price_cents: row.price_cents,
            status,
            version: row.version,
            secured_at: row.secured_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
