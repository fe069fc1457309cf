use std::sync::Arc;

use ports_core::simulation::SimulationEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ports_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client of the external simulation service.
    pub engine: Arc<dyn SimulationEngine>,
}
