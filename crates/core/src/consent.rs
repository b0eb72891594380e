//! Consent record and the dual-review decision rule.
//!
//! [`evaluate_review`] is the single place that decides what a review call
//! does to a consent record and its content status. Every
//! [`ModerationStore`](crate::store::ModerationStore) calls it while holding
//! the content row exclusively, so the guard check, the flag write, and the
//! promotion decision happen in one atomic step.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Capability;
use crate::status::ContentStatus;
use crate::types::{DbId, Timestamp};

/// Three-way approval ledger, one per content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsentRecord {
    pub content_id: DbId,
    /// Set once, by the owner, on submit.
    pub performer_approved: bool,
    pub safety_approved: bool,
    pub moderator_approved: bool,
    pub signed_at: Option<Timestamp>,
}

impl ConsentRecord {
    /// Empty record created alongside a draft.
    pub fn empty(content_id: DbId) -> Self {
        Self {
            content_id,
            performer_approved: false,
            safety_approved: false,
            moderator_approved: false,
            signed_at: None,
        }
    }

    pub fn flag(&self, kind: ApprovalKind) -> bool {
        match kind {
            ApprovalKind::Safety => self.safety_approved,
            ApprovalKind::Moderation => self.moderator_approved,
        }
    }

    fn set_flag(&mut self, kind: ApprovalKind) {
        match kind {
            ApprovalKind::Safety => self.safety_approved = true,
            ApprovalKind::Moderation => self.moderator_approved = true,
        }
    }

    /// Both independent reviewers have approved.
    pub fn is_fully_reviewed(&self) -> bool {
        self.safety_approved && self.moderator_approved
    }
}

/// Which independent reviewer a decision comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    Safety,
    Moderation,
}

impl ApprovalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalKind::Safety => "safety",
            ApprovalKind::Moderation => "moderation",
        }
    }

    /// Capability a caller needs to decide on this kind.
    pub fn capability(self) -> Capability {
        match self {
            ApprovalKind::Safety => Capability::ReviewSafety,
            ApprovalKind::Moderation => Capability::ReviewModeration,
        }
    }
}

impl std::fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approve,
    Reject,
}

/// One reviewer's call on one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDecision {
    pub kind: ApprovalKind,
    pub verdict: Verdict,
    /// Free-text reason, recorded in the audit detail of rejections.
    pub reason: Option<String>,
}

impl ReviewDecision {
    pub fn approve(kind: ApprovalKind) -> Self {
        Self {
            kind,
            verdict: Verdict::Approve,
            reason: None,
        }
    }

    pub fn reject(kind: ApprovalKind, reason: Option<String>) -> Self {
        Self {
            kind,
            verdict: Verdict::Reject,
            reason,
        }
    }
}

/// What a review does once its guard has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTransition {
    pub consent: ConsentRecord,
    pub status: ContentStatus,
    /// False when the reviewer had already approved; nothing is written.
    pub changed: bool,
    /// This write moved the content to `APPROVED`.
    pub promoted: bool,
}

/// Apply `decision` to a content item currently in `status` with `consent`.
///
/// Fails with [`CoreError::InvalidState`] unless `status` is `REVIEW`.
/// A rejection from either reviewer is immediately terminal. An approval
/// promotes only when both reviewer flags are true after this write.
pub fn evaluate_review(
    content_id: DbId,
    status: ContentStatus,
    consent: &ConsentRecord,
    decision: &ReviewDecision,
) -> Result<ReviewTransition, CoreError> {
    if status != ContentStatus::Review {
        return Err(CoreError::InvalidState(format!(
            "Content {content_id} is {status}, expected review"
        )));
    }

    match decision.verdict {
        Verdict::Reject => Ok(ReviewTransition {
            consent: consent.clone(),
            status: ContentStatus::Rejected,
            changed: true,
            promoted: false,
        }),
        Verdict::Approve if consent.flag(decision.kind) => Ok(ReviewTransition {
            consent: consent.clone(),
            status,
            changed: false,
            promoted: false,
        }),
        Verdict::Approve => {
            let mut next = consent.clone();
            next.set_flag(decision.kind);
            let promoted = next.is_fully_reviewed();
            Ok(ReviewTransition {
                consent: next,
                status: if promoted {
                    ContentStatus::Approved
                } else {
                    ContentStatus::Review
                },
                changed: true,
                promoted,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn submitted() -> ConsentRecord {
        ConsentRecord {
            performer_approved: true,
            signed_at: Some(chrono::Utc::now()),
            ..ConsentRecord::empty(1)
        }
    }

    #[test]
    fn first_approval_stays_in_review() {
        let t = evaluate_review(
            1,
            ContentStatus::Review,
            &submitted(),
            &ReviewDecision::approve(ApprovalKind::Safety),
        )
        .unwrap();
        assert_eq!(t.status, ContentStatus::Review);
        assert!(t.consent.safety_approved);
        assert!(!t.consent.moderator_approved);
        assert!(t.changed);
        assert!(!t.promoted);
    }

    #[test]
    fn second_approval_promotes() {
        let mut consent = submitted();
        consent.moderator_approved = true;
        let t = evaluate_review(
            1,
            ContentStatus::Review,
            &consent,
            &ReviewDecision::approve(ApprovalKind::Safety),
        )
        .unwrap();
        assert_eq!(t.status, ContentStatus::Approved);
        assert!(t.consent.is_fully_reviewed());
        assert!(t.promoted);
    }

    #[test]
    fn repeated_approval_is_a_no_op() {
        let mut consent = submitted();
        consent.safety_approved = true;
        let t = evaluate_review(
            1,
            ContentStatus::Review,
            &consent,
            &ReviewDecision::approve(ApprovalKind::Safety),
        )
        .unwrap();
        assert!(!t.changed);
        assert!(!t.promoted);
        assert_eq!(t.status, ContentStatus::Review);
        assert_eq!(t.consent, consent);
    }

    #[test]
    fn rejection_short_circuits_without_touching_flags() {
        let mut consent = submitted();
        consent.safety_approved = true;
        let t = evaluate_review(
            1,
            ContentStatus::Review,
            &consent,
            &ReviewDecision::reject(ApprovalKind::Moderation, Some("policy".into())),
        )
        .unwrap();
        assert_eq!(t.status, ContentStatus::Rejected);
        assert_eq!(t.consent, consent);
        assert!(!t.promoted);
    }

    #[test]
    fn decisions_outside_review_are_invalid_state() {
        for status in [
            ContentStatus::Draft,
            ContentStatus::Approved,
            ContentStatus::Rejected,
        ] {
            for decision in [
                ReviewDecision::approve(ApprovalKind::Safety),
                ReviewDecision::reject(ApprovalKind::Moderation, None),
            ] {
                assert_matches!(
                    evaluate_review(1, status, &submitted(), &decision),
                    Err(CoreError::InvalidState(_))
                );
            }
        }
    }

    #[test]
    fn kind_capabilities() {
        assert_eq!(ApprovalKind::Safety.capability(), Capability::ReviewSafety);
        assert_eq!(
            ApprovalKind::Moderation.capability(),
            Capability::ReviewModeration
        );
    }

    #[test]
    fn kind_deserializes_from_lowercase() {
        let kind: ApprovalKind = serde_json::from_str("\"moderation\"").unwrap();
        assert_eq!(kind, ApprovalKind::Moderation);
        assert!(serde_json::from_str::<ApprovalKind>("\"legal\"").is_err());
    }
}
