//! Report Query - parameterized SQL assembly for reporting endpoints
//!
//! This crate provides the query builder that turns untrusted query-string
//! input into `WHERE`/`ORDER BY`/`LIMIT` clauses plus a positional parameter
//! list, the pagination helper that normalizes page/limit input, and the
//! response envelopes shared by every report handler.

/// Conditional debug logging, compiled in only with the `debug-logging` feature
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod binding;
pub mod prelude;
pub mod query_builder;
pub mod response;

pub use binding::bind_query_scalar;
pub use query_builder::{
    paginated_response, parse_pagination, Condition, PageRequest, PaginationPolicy,
    PaginationQuery, QueryBuilder, SortOrder, SortWhitelist, PLACEHOLDER,
};
pub use response::{ApiResponse, Paginated, PaginationMeta};
