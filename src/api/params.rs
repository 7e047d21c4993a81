//! Lenient query-string extraction
//!
//! Dashboard filters must never fail a request. Repeated keys keep their first
//! value and an unparseable query string is treated as empty, where axum's
//! typed `Query` would answer a plain-text 400.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use http::request::Parts;
use http::Uri;
use tracing::warn;

use report_query::PaginationQuery;

/// Query-string values keyed by name, first occurrence wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn from_uri(uri: &Uri) -> Self {
        match Query::<Vec<(String, String)>>::try_from_uri(uri) {
            Ok(Query(pairs)) => Self::from_pairs(pairs),
            Err(rejection) => {
                warn!(error = %rejection, "Ignoring unparseable query string");
                Self::default()
            }
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values.entry(key).or_insert(value);
        }
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn owned(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.get("page"), self.get("limit"))
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(uri: &str) -> QueryParams {
        QueryParams::from_uri(&uri.parse::<Uri>().unwrap())
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let p = params("/x?page=2&page=3&status=A&status=B");
        assert_eq!(p.get("page"), Some("2"));
        assert_eq!(p.get("status"), Some("A"));
    }

    #[test]
    fn test_percent_decoding_and_missing_keys() {
        let p = params("/x?search=ana%20lima&sortBy=totalSpent&flag");
        assert_eq!(p.get("search"), Some("ana lima"));
        assert_eq!(p.owned("sortBy"), Some("totalSpent".to_string()));
        assert_eq!(p.get("flag"), Some(""));
        assert_eq!(p.get("city"), None);
    }

    #[test]
    fn test_without_query_string() {
        let p = params("/x");
        assert_eq!(p, QueryParams::default());
        assert_eq!(p.pagination(), PaginationQuery::new(None, None));
    }
}
