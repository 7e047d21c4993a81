//! # ReportHaus
//!
//! A reporting and analytics HTTP API over a PostgreSQL e-commerce schema.
//! Filtered list views are assembled with [`report_query::QueryBuilder`], so
//! every user-supplied value travels as a positional parameter and only
//! whitelisted SQL reaches `ORDER BY`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reporthaus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!
//!     let reporthaus = ReportHaus::new(&config.database).await?;
//!     let state = AppState::from_config(reporthaus.store(), &config.pagination);
//!     let app = build_app(state, &config.server);
//!
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod api;
pub mod core;
pub mod errors;
pub mod prelude;
pub mod store;

// Re-export the main public types for convenience
pub use crate::core::ReportHaus;
pub use crate::errors::ReportError;
pub use crate::store::{JsonRow, PgReportStore, ReportStore};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PaginationConfig, ServerConfig};

// Re-export the query crate used throughout the handlers
pub use report_query;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
