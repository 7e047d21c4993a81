//! Data access for report handlers
//!
//! Handlers never touch the pool directly; they go through [`ReportStore`],
//! which the server wires to Postgres and tests replace with a fake.

use async_trait::async_trait;
use report_query::bind_query_scalar;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::errors::ReportError;

/// One result row keyed by column name
pub type JsonRow = Map<String, Value>;

/// Read-only query execution with positional parameters
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Run `sql` and return every row as a JSON object, in result order
    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<JsonRow>, ReportError>;

    /// Run a `SELECT COUNT(*) ...` statement
    async fn fetch_count(&self, sql: &str, params: Vec<Value>) -> Result<i64, ReportError>;

    /// Round-trip to the database
    async fn ping(&self) -> Result<(), ReportError>;
}

/// [`ReportStore`] backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<JsonRow>, ReportError> {
        let wrapped = wrap_as_json_array(sql);
        crate::trace_log!("[REPORT_STORE] rows SQL: {}", wrapped);
        crate::debug_log!("[REPORT_STORE] params: {:?}", params);

        let query = sqlx::query_scalar::<_, Json<Vec<JsonRow>>>(&wrapped);
        let Json(rows) = bind_query_scalar(query, params)
            .fetch_one(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn fetch_count(&self, sql: &str, params: Vec<Value>) -> Result<i64, ReportError> {
        crate::trace_log!("[REPORT_STORE] count SQL: {}", sql);
        crate::debug_log!("[REPORT_STORE] params: {:?}", params);

        let total = bind_query_scalar(sqlx::query_scalar::<_, i64>(sql), params)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn ping(&self) -> Result<(), ReportError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Aggregate a statement's rows into one JSON array.
///
/// Row order relies on Postgres feeding `json_agg` from a plain scan of an
/// ordered subquery, which holds in practice but is not guaranteed by the SQL
/// standard. The statement's own ORDER BY must stay inside the subquery and
/// nothing may be joined onto `report_rows` here.
fn wrap_as_json_array(sql: &str) -> String {
    format!(
        "SELECT COALESCE(json_agg(report_rows), '[]'::json) FROM ({}) AS report_rows",
        sql.trim().trim_end_matches(';')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_strips_trailing_semicolon() {
        assert_eq!(
            wrap_as_json_array("  SELECT 1 AS one;\n"),
            "SELECT COALESCE(json_agg(report_rows), '[]'::json) FROM (SELECT 1 AS one) AS report_rows"
        );
    }

    #[test]
    fn test_wrap_keeps_ordering_inside_the_subquery() {
        let wrapped = wrap_as_json_array("SELECT name FROM products_table ORDER BY name DESC LIMIT 6");
        assert!(wrapped.ends_with("ORDER BY name DESC LIMIT 6) AS report_rows"));
        assert_eq!(wrapped.matches("ORDER BY").count(), 1);
    }
}
