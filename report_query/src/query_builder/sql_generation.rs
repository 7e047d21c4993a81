//! Query builder utilities
//!
//! This module renders accumulated conditions into SQL clauses.

use crate::query_builder::condition::Condition;
use crate::query_builder::ordering::SortOrder;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause from conditions, numbering placeholders from `$1`
    pub fn build_where_clause(conditions: &[Condition]) -> String {
        if conditions.is_empty() {
            return "".to_string();
        }

        let conditions_sql = conditions
            .iter()
            .enumerate()
            .map(|(position, condition)| condition.render(position + 1))
            .collect::<Vec<_>>()
            .join(" AND ");

        format!("WHERE {}", conditions_sql)
    }

    /// Build ORDER BY clause from a whitelisted expression
    pub fn build_order_clause(expression: &str, order: SortOrder) -> String {
        format!("ORDER BY {} {}", expression, order.to_sql())
    }

    /// Build LIMIT/OFFSET clause whose limit takes placeholder `first_index`
    pub fn build_limit_clause(first_index: usize) -> String {
        format!("LIMIT ${} OFFSET ${}", first_index, first_index + 1)
    }

    /// Build HAVING clause from static aggregate predicates
    pub fn build_having_clause(predicates: &[&str]) -> String {
        if predicates.is_empty() {
            return "".to_string();
        }

        format!("HAVING {}", predicates.join(" AND "))
    }
}
