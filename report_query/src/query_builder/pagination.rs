//! Query builder utilities
//!
//! This module normalizes page/limit input and wraps list results.

use crate::response::{Paginated, PaginationMeta};
use serde::{Deserialize, Serialize};

/// Raw pagination input exactly as it arrives on the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationQuery {
    pub fn new(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }
}

/// Default and maximum page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl PaginationPolicy {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(default_limit: i64, max_limit: i64) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, Self::MAX_LIMIT)
    }
}

/// Normalized pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Normalize raw page/limit input. Never fails.
///
/// A page that is missing, non-numeric or below 1 becomes 1. A limit that is
/// missing, non-numeric or below 1 becomes the policy default, and a limit
/// above the policy maximum is capped.
pub fn parse_pagination(raw: &PaginationQuery, policy: &PaginationPolicy) -> PageRequest {
    let page = parse_positive(raw.page.as_deref()).unwrap_or(1);
    let limit = parse_positive(raw.limit.as_deref())
        .unwrap_or(policy.default_limit)
        .min(policy.max_limit);
    let offset = (page - 1).saturating_mul(limit);

    PageRequest {
        page,
        limit,
        offset,
    }
}

/// Wrap one page of rows into the paginated envelope
pub fn paginated_response<T>(rows: Vec<T>, total: i64, page: i64, limit: i64) -> Paginated<T> {
    Paginated {
        success: true,
        data: rows,
        pagination: PaginationMeta {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        },
    }
}

fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 1)
}
