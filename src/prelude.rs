//! Convenience re-exports for common ReportHaus usage
//!
//! # Example
//!
//! ```rust
//! use reporthaus::prelude::*;
//! ```

// Core ReportHaus components
pub use crate::api::{build_app, routes, AppState};
pub use crate::core::ReportHaus;
pub use crate::errors::ReportError;
pub use crate::store::{JsonRow, PgReportStore, ReportStore};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PaginationConfig, ServerConfig};

// Query assembly and response envelopes
pub use report_query::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;

pub use sqlx::PgPool;
