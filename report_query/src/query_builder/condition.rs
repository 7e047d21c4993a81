//! Query builder utilities
//!
//! This module provides the typed fragment/value pairs a builder accumulates.

use serde_json::Value;

/// Marker a fragment template uses where its placeholder index goes
pub const PLACEHOLDER: &str = "$?";

/// Sentinel sent by dashboard dropdowns meaning "no filter"
const ALL_SENTINEL: &str = "All";

/// Single condition in a WHERE clause, owning exactly one bound value
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Boolean fragment such as `o.channel = $?`
    Fragment { template: String, value: Value },
    /// `(col ILIKE $n OR col ILIKE $n ...)` sharing one `%term%` value
    Search { columns: Vec<String>, value: Value },
}

impl Condition {
    /// Create a fragment condition.
    ///
    /// Panics if `template` does not contain exactly one [`PLACEHOLDER`].
    pub fn fragment(template: &str, value: Value) -> Self {
        assert_single_placeholder(template);
        Self::Fragment {
            template: template.to_string(),
            value,
        }
    }

    /// Create a case-insensitive contains search over `columns`.
    ///
    /// Returns `None` when the trimmed term is empty. Panics on an empty column list.
    pub fn search(columns: &[&str], term: &str) -> Option<Self> {
        assert!(
            !columns.is_empty(),
            "search condition needs at least one column"
        );

        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        Some(Self::Search {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            value: Value::String(format!("%{}%", term)),
        })
    }

    /// The single value this condition binds
    pub fn value(&self) -> &Value {
        match self {
            Self::Fragment { value, .. } | Self::Search { value, .. } => value,
        }
    }

    /// Render the fragment with its placeholder bound to `$index`
    pub fn render(&self, index: usize) -> String {
        let param = format!("${}", index);
        match self {
            Self::Fragment { template, .. } => template.replacen(PLACEHOLDER, &param, 1),
            Self::Search { columns, .. } => {
                let alternatives = columns
                    .iter()
                    .map(|column| format!("{} ILIKE {}", column, param))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                format!("({})", alternatives)
            }
        }
    }
}

/// Whether a filter value should produce a condition at all.
///
/// Absent inputs arrive as `Null`; the empty string and `"All"` mean the
/// dashboard did not narrow the result.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty() && s != ALL_SENTINEL,
        _ => true,
    }
}

fn assert_single_placeholder(template: &str) {
    let markers = template.matches(PLACEHOLDER).count();
    assert_eq!(
        markers, 1,
        "condition template {:?} must contain exactly one {} marker, found {}",
        template, PLACEHOLDER, markers
    );
}
