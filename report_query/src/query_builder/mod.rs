//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

pub mod builder;
pub mod condition;
pub mod ordering;
pub mod pagination;
pub mod sql_generation;

#[cfg(test)]
mod tests;

pub use builder::QueryBuilder;
pub use condition::{Condition, PLACEHOLDER};
pub use ordering::{SortOrder, SortWhitelist};
pub use pagination::{
    paginated_response, parse_pagination, PageRequest, PaginationPolicy, PaginationQuery,
};
