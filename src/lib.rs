pub mod clock;
pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::clock::Clock;
use crate::context::QueryContext;
use crate::errors::AppError;
use crate::models::dashboard::DashboardLimits;
use crate::models::limit::Limit;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub clock: Arc<dyn Clock>,
    pub limits: DashboardLimits,
}

impl AppState {
    /// Build state, rejecting configured dashboard limits outside the valid range.
    pub fn new(
        db: PgPool,
        config: config::AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let limits = DashboardLimits {
            recent: Limit::new(config.dashboard_recent_limit)?,
            top: Limit::new(config.dashboard_top_limit)?,
        };
        Ok(Self {
            db,
            config,
            clock,
            limits,
        })
    }

    /// Fresh cancellation scope with the configured deadline, one per request.
    pub fn query_context(&self) -> QueryContext {
        QueryContext::with_timeout(self.config.query_timeout())
    }
}
