//! Convenience re-exports for report handlers

pub use crate::binding::bind_query_scalar;
pub use crate::query_builder::{
    paginated_response, parse_pagination, Condition, PageRequest, PaginationPolicy,
    PaginationQuery, QueryBuilder, SortOrder, SortWhitelist,
};
pub use crate::response::{ApiResponse, Paginated};

pub use serde_json::{json, Value};
