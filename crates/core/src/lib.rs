//! Consentry domain core.
//!
//! Pure domain logic for the content moderation and consent pipeline: the
//! content lifecycle, the three-way consent record, the audit vocabulary,
//! the identity and storage seams, and the [`engine::ModerationEngine`]
//! that drives approvals and emergency stops. No module here performs I/O
//! directly; persistence is reached through [`store::ModerationStore`].

pub mod audit;
pub mod booking;
pub mod consent;
pub mod content;
pub mod emergency;
pub mod engine;
pub mod error;
pub mod identity;
pub mod memory;
pub mod roles;
pub mod status;
pub mod store;
pub mod types;
