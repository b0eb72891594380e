//! Request extractors.
//!
//! - [`auth::AuthUser`] -- resolves the bearer credential into a
//!   [`Caller`](consentry_core::identity::Caller).

pub mod auth;
