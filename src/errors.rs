//! Error types for the ReportHaus crate
//!
//! This module contains the errors report handlers can return and their
//! translation into JSON HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Route not found")]
    NotFound,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ReportError::Query(err) => {
                // Driver details stay in the logs
                tracing::error!(error = %err, "Report query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Query failed")
            }
            ReportError::NotFound => (StatusCode::NOT_FOUND, "Route not found"),
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, Json(body)).into_response()
    }
}

/// Handler result alias
pub type Result<T> = std::result::Result<T, ReportError>;
