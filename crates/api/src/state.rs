use std::sync::Arc;
use std::time::Duration;

use streamcode_core::codes::CodeGenerator;

use crate::config::ServerConfig;
use crate::services::{IssuanceService, RedemptionService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: streamcode_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Creates discounts and gifts together with their codes.
    pub issuance: IssuanceService,
    /// Consumes gift capacity.
    pub redemption: RedemptionService,
}

impl AppState {
    /// Wire the services to the process-wide pool and code generator.
    pub fn new(pool: streamcode_db::DbPool, config: ServerConfig, codes: Arc<CodeGenerator>) -> Self {
        let store_timeout = config.store_timeout();
        Self {
            issuance: IssuanceService::new(pool.clone(), codes, store_timeout),
            redemption: RedemptionService::new(pool.clone(), store_timeout),
            pool,
            config: Arc::new(config),
        }
    }

    /// Deadline applied to each store call made by a handler.
    pub fn store_timeout(&self) -> Duration {
        self.config.store_timeout()
    }
}
