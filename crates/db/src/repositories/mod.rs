//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept any `PgExecutor` (a `&PgPool` for standalone reads, or
//! `&mut *tx` inside a transaction) as the first argument.

pub mod audit_repo;
pub mod booking_repo;
pub mod consent_repo;
pub mod content_repo;

pub use audit_repo::AuditEventRepo;
pub use booking_repo::BookingRepo;
pub use consent_repo::ConsentRepo;
pub use content_repo::ContentRepo;
