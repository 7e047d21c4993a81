//! Row shaping helpers
//!
//! Rows arrive as JSON objects; Postgres numerics may come through as numbers
//! or strings, so every reader is lenient and falls back to zero.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::store::JsonRow;

pub const CATEGORY_PALETTE: &[&str] = &["#6C63FF", "#00C9A7", "#FFB347", "#FF6584", "#C77DFF", "#43D9AD"];
pub const CHANNEL_PALETTE: &[&str] = &["#6C63FF", "#00C9A7", "#FFB347", "#FF6584"];
pub const PAYMENT_PALETTE: &[&str] = &["#6C63FF", "#00C9A7", "#FFB347", "#FF6584", "#C77DFF"];

const DEFAULT_STATUS_COLOR: &str = "#8892A4";

pub fn number(row: &JsonRow, key: &str) -> f64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn integer(row: &JsonRow, key: &str) -> i64 {
    match row.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().map(|f| f.trunc() as i64).unwrap_or(0)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

pub fn text<'a>(row: &'a JsonRow, key: &str) -> Option<&'a str> {
    row.get(key).and_then(Value::as_str)
}

pub fn owned_text(row: &JsonRow, key: &str) -> String {
    text(row, key).unwrap_or_default().to_string()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Share of `total` as a percentage with one decimal, 0 when the total is 0
pub fn percent_share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        round_to(part / total * 100.0, 1)
    } else {
        0.0
    }
}

pub fn cycle_color(palette: &[&'static str], index: usize) -> &'static str {
    palette[index % palette.len()]
}

pub fn status_color(status: &str) -> &'static str {
    match status {
        "DELIVERED" => "#00C9A7",
        "SHIPPED" => "#6C63FF",
        "CONFIRMED" => "#FFB347",
        "PENDING" => "#8892A4",
        "CANCELLED" => "#FF6584",
        _ => DEFAULT_STATUS_COLOR,
    }
}

/// `SHIPPED` -> `Shipped`
pub fn title_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `#SM` followed by the upper-cased last six characters of the order id
pub fn display_order_id(order_id: &str) -> String {
    let chars: Vec<char> = order_id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(6)..].iter().collect();
    format!("#SM{}", tail.to_uppercase())
}

/// UTC calendar date of a JSON-rendered Postgres timestamp.
///
/// Offset timestamps are shifted to UTC first; naive ones are taken as UTC.
pub fn display_date(raw: &str) -> String {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.with_timezone(&Utc).format("%Y-%m-%d").to_string();
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return timestamp.format("%Y-%m-%d").to_string();
    }
    raw.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> JsonRow {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_numeric_readers_accept_numbers_and_strings() {
        let r = row(json!({"a": 12.5, "b": "7", "c": "3.9", "d": null, "e": 41}));
        assert_eq!(number(&r, "a"), 12.5);
        assert_eq!(number(&r, "b"), 7.0);
        assert_eq!(number(&r, "d"), 0.0);
        assert_eq!(number(&r, "missing"), 0.0);
        assert_eq!(integer(&r, "c"), 3);
        assert_eq!(integer(&r, "e"), 41);
        assert_eq!(integer(&r, "a"), 12);
    }

    #[test]
    fn test_percent_share() {
        assert_eq!(percent_share(1.0, 3.0), 33.3);
        assert_eq!(percent_share(2.0, 3.0), 66.7);
        assert_eq!(percent_share(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(cycle_color(CHANNEL_PALETTE, 0), "#6C63FF");
        assert_eq!(cycle_color(CHANNEL_PALETTE, 5), "#00C9A7");
    }

    #[test]
    fn test_status_helpers() {
        assert_eq!(title_case("SHIPPED"), "Shipped");
        assert_eq!(title_case(""), "");
        assert_eq!(status_color("DELIVERED"), "#00C9A7");
        assert_eq!(status_color("RETURNED"), "#8892A4");
    }

    #[test]
    fn test_display_order_id() {
        assert_eq!(
            display_order_id("5f0c2a9e-1b7d-4c1e-9a3f-00ab12cd34ef"),
            "#SMCD34EF"
        );
        assert_eq!(display_order_id("ab1"), "#SMAB1");
    }

    #[test]
    fn test_display_date_uses_the_utc_day() {
        assert_eq!(display_date("2025-03-10T02:00:00+05:30"), "2025-03-09");
        assert_eq!(display_date("2025-03-09T22:30:00-03:00"), "2025-03-10");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2025-03-09T18:45:12.123456+05:30"), "2025-03-09");
        assert_eq!(display_date("2025-03-09T21:15:00Z"), "2025-03-09");
        assert_eq!(display_date("2025-03-09T18:45:12.5"), "2025-03-09");
        assert_eq!(display_date("2025-03-09"), "2025-03-09");
    }
}
