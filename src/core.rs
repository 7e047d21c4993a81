//! Core ReportHaus functionality
//!
//! This module contains the ReportHaus coordinator, which owns the database
//! pool and hands report handlers an injectable [`ReportStore`].

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ReportError;
use crate::store::{PgReportStore, ReportStore};
use config::DatabaseConfig;

/// Owns the database connection pool shared by all requests
#[derive(Debug, Clone)]
pub struct ReportHaus {
    pool: PgPool,
}

impl ReportHaus {
    /// Create new ReportHaus with database connection
    pub async fn new(config: &DatabaseConfig) -> Result<Self, ReportError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        tracing::info!(target_db = %config.redacted_target(), "Connected to PostgreSQL");

        Ok(Self { pool })
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Report store over this pool, ready to inject into handlers
    pub fn store(&self) -> Arc<dyn ReportStore> {
        Arc::new(PgReportStore::new(self.pool.clone()))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), ReportError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
