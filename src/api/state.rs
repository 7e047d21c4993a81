use std::sync::Arc;
use std::time::Instant;

use config::PaginationConfig;
use report_query::PaginationPolicy;

use crate::store::ReportStore;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub pagination: PaginationPolicy,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn ReportStore>, pagination: PaginationPolicy) -> Self {
        Self {
            store,
            pagination,
            started_at: Instant::now(),
        }
    }

    pub fn from_config(store: Arc<dyn ReportStore>, pagination: &PaginationConfig) -> Self {
        Self::new(
            store,
            PaginationPolicy::new(pagination.default_limit, pagination.max_limit),
        )
    }
}
