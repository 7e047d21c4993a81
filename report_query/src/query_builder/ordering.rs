//! Query builder utilities
//!
//! This module provides whitelisted ORDER BY construction.

use crate::query_builder::sql_generation::SqlGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// `asc` in any case sorts ascending; anything else, including nothing, descends
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Maps client sort keys onto the only SQL expressions allowed in ORDER BY
#[derive(Debug, Clone, Copy)]
pub struct SortWhitelist {
    columns: &'static [(&'static str, &'static str)],
    default: &'static str,
}

impl SortWhitelist {
    pub const fn new(
        columns: &'static [(&'static str, &'static str)],
        default: &'static str,
    ) -> Self {
        Self { columns, default }
    }

    /// SQL expression for `key`, falling back to the default expression
    pub fn resolve(&self, key: Option<&str>) -> &'static str {
        key.and_then(|key| {
            self.columns
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, expression)| *expression)
        })
        .unwrap_or(self.default)
    }

    /// Build `ORDER BY <expression> <direction>` from raw query values
    pub fn order_clause(&self, sort_by: Option<&str>, sort_order: Option<&str>) -> String {
        SqlGenerator::build_order_clause(self.resolve(sort_by), SortOrder::from_query(sort_order))
    }
}
