//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

use crate::query_builder::condition::{is_present, Condition};
use crate::query_builder::sql_generation::SqlGenerator;
use serde_json::Value;

/// Accumulates filter conditions and renders them with positional parameters.
///
/// Placeholders are numbered at render time from each condition's position,
/// so the Nth condition always references `$N` and `params()[N - 1]`.
/// LIMIT/OFFSET values are appended after every filter value, which lets a
/// caller snapshot [`QueryBuilder::params`] for a `COUNT(*)` query and then
/// extend the same builder for the data query.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) conditions: Vec<Condition>,
    pub(crate) pagination: Option<(i64, i64)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `template` bound to `value` when the value is present.
    ///
    /// `None`, JSON null, `""` and `"All"` are no-ops. The template must hold
    /// exactly one `$?` marker; it is checked even when the value is absent.
    pub fn add_condition<V>(&mut self, template: &str, value: Option<V>) -> &mut Self
    where
        V: Into<Value>,
    {
        let value = value.map(Into::into).unwrap_or(Value::Null);
        let condition = Condition::fragment(template, value);

        if is_present(condition.value()) {
            self.push(condition);
        }
        self
    }

    /// Add a case-insensitive contains search across `columns`.
    ///
    /// Every column shares one placeholder bound to `%term%`. Blank terms are no-ops.
    pub fn add_search(&mut self, columns: &[&str], term: Option<&str>) -> &mut Self {
        if let Some(condition) = term.and_then(|t| Condition::search(columns, t)) {
            self.push(condition);
        }
        self
    }

    /// `WHERE a AND b ...`, or the empty string when nothing was added
    pub fn where_clause(&self) -> String {
        SqlGenerator::build_where_clause(&self.conditions)
    }

    /// Append LIMIT and OFFSET values and return `LIMIT $i OFFSET $j`.
    ///
    /// Must be the last call on a builder: filters added afterwards would
    /// shift the pagination placeholders, so that panics.
    pub fn add_pagination(&mut self, limit: i64, offset: i64) -> String {
        assert!(
            self.pagination.is_none(),
            "pagination was already added to this query"
        );

        let first_index = self.next_index();
        self.pagination = Some((limit, offset));
        let clause = SqlGenerator::build_limit_clause(first_index);
        debug_log!("[QUERY_BUILDER] {} with params {:?}", clause, self.params());
        clause
    }

    /// All bound values in placeholder order.
    ///
    /// The returned vector is an owned snapshot; later calls do not change it.
    pub fn params(&self) -> Vec<Value> {
        let mut params = self.filter_params();
        if let Some((limit, offset)) = self.pagination {
            params.push(Value::from(limit));
            params.push(Value::from(offset));
        }
        params
    }

    /// Bound values of the filter conditions only, never LIMIT/OFFSET
    pub fn filter_params(&self) -> Vec<Value> {
        self.conditions.iter().map(|c| c.value().clone()).collect()
    }

    /// Index the next placeholder will take
    pub fn next_index(&self) -> usize {
        let pagination_params = if self.pagination.is_some() { 2 } else { 0 };
        self.conditions.len() + pagination_params + 1
    }

    fn push(&mut self, condition: Condition) {
        assert!(
            self.pagination.is_none(),
            "filters must be added before pagination"
        );
        self.conditions.push(condition);
    }
}
