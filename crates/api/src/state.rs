use std::sync::Arc;

use crate::config::ServerConfig;
use crate::tally::client::FormProvider;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The form
/// provider is constructed once at startup and injected here rather than
/// living as a module-level singleton, so tests can substitute a stub.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gradlink_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the external form provider's management API.
    pub provider: Arc<dyn FormProvider>,
}
