//! Content entity, creation input, and the submit guard.
//!
//! Descriptive fields (title, description, tags, price) are carried through
//! untouched; only `status` and `owner_id` matter to the state machine.

use serde::{Deserialize, Serialize};

use crate::consent::ConsentRecord;
use crate::error::CoreError;
use crate::identity::Caller;
use crate::status::ContentStatus;
use crate::types::{DbId, Timestamp};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum number of tags per content item.
pub const MAX_TAGS: usize = 20;

/// One unit of performer-submitted work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub price_cents: Option<i64>,
    pub status: ContentStatus,
    /// Incremented on every write, including emergency-stop checkpoints.
    pub version: i32,
    /// Last emergency-stop checkpoint while in review.
    pub secured_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Descriptive metadata supplied when creating content.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContent {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price_cents: Option<i64>,
}

impl CreateContent {
    /// Validate descriptive metadata before anything is written.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation("Title must not be empty".into()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if self.tags.len() > MAX_TAGS {
            return Err(CoreError::Validation(format!(
                "At most {MAX_TAGS} tags are allowed"
            )));
        }
        if matches!(self.price_cents, Some(p) if p < 0) {
            return Err(CoreError::Validation("Price must not be negative".into()));
        }
        Ok(())
    }
}

/// A content row together with its consent record.
#[derive(Debug, Clone, Serialize)]
pub struct ContentWithConsent {
    pub content: Content,
    pub consent: ConsentRecord,
}

/// Guard for `DRAFT -> REVIEW`.
///
/// Ownership is checked first: a non-owner learns nothing about the
/// current status.
pub fn check_submit(content: &Content, caller: &Caller) -> Result<(), CoreError> {
    if content.owner_id != caller.id {
        return Err(CoreError::Forbidden(
            "Only the owning performer may submit content for review".into(),
        ));
    }
    if content.status != ContentStatus::Draft {
        return Err(CoreError::InvalidState(format!(
            "Content {} is {}, expected draft",
            content.id, content.status
        )));
    }
    Ok(())
}
