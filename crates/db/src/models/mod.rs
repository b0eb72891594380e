//! Row models.
//!
//! Each submodule contains a `FromRow` struct matching one table and a
//! conversion into the corresponding `consentry_core` domain type.

pub mod audit;
pub mod booking;
pub mod consent;
pub mod content;
