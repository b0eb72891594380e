use std::sync::Arc;

use consentry_core::engine::ModerationEngine;
use consentry_core::identity::IdentityResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Approval engine and emergency stop controller.
    pub engine: ModerationEngine,
    /// Turns bearer credentials into callers.
    pub identity: Arc<dyn IdentityResolver>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
