//! Credential handling.
//!
//! - [`jwt`] -- access-token generation and validation, and the
//!   JWT-backed [`IdentityResolver`](consentry_core::identity::IdentityResolver).

pub mod jwt;
