//! Fixed dashboard overview reports
//!
//! None of these take query parameters. Each handler runs its SQL, then shapes
//! the rows into the card and chart structures the dashboard renders.

use axum::{extract::State, Json};
use serde::Serialize;

use super::shaping::{
    cycle_color, display_date, display_order_id, integer, number, owned_text, percent_share,
    round_to, status_color, text, title_case, CATEGORY_PALETTE, CHANNEL_PALETTE, PAYMENT_PALETTE,
};
use super::state::AppState;
use crate::errors::Result;
use crate::store::{JsonRow, ReportStore};
use report_query::ApiResponse;

type Report<T> = Result<Json<ApiResponse<T>>>;

const PAID_REVENUE_SQL: &str =
    "SELECT COALESCE(SUM(total_amount), 0) AS val FROM orders_table WHERE payment_status = 'PAID'";
const ORDER_COUNT_SQL: &str = "SELECT COUNT(*) AS val FROM orders_table";
const CUSTOMER_COUNT_SQL: &str = "SELECT COUNT(*) AS val FROM customers";
const PAID_AOV_SQL: &str =
    "SELECT COALESCE(AVG(total_amount), 0) AS val FROM orders_table WHERE payment_status = 'PAID'";
const STOCK_UNITS_SQL: &str = "SELECT COALESCE(SUM(stock_quantity), 0) AS val FROM product_variants";
const CANCELLED_COUNT_SQL: &str =
    "SELECT COUNT(*) AS val FROM orders_table WHERE order_status = 'CANCELLED'";

const REVENUE_TREND_SQL: &str = r#"
    SELECT
        TO_CHAR(DATE_TRUNC('month', created_at), 'Mon') AS month,
        DATE_TRUNC('month', created_at) AS month_date,
        COALESCE(SUM(total_amount), 0) AS revenue
    FROM orders_table
    WHERE payment_status = 'PAID'
      AND created_at >= NOW() - INTERVAL '12 months'
    GROUP BY DATE_TRUNC('month', created_at)
    ORDER BY month_date ASC
"#;

const CATEGORY_SPLIT_SQL: &str = r#"
    SELECT p.category, COALESCE(SUM(oi.total_price), 0) AS revenue
    FROM order_items oi
    JOIN product_variants pv ON pv.variant_id = oi.variant_id
    JOIN products_table p ON p.product_id = pv.product_id
    GROUP BY p.category
    ORDER BY revenue DESC
"#;

const TOP_PRODUCTS_SQL: &str = r#"
    SELECT
        p.name,
        COALESCE(SUM(oi.quantity), 0) AS units,
        COALESCE(SUM(oi.total_price), 0) AS revenue
    FROM order_items oi
    JOIN product_variants pv ON pv.variant_id = oi.variant_id
    JOIN products_table p ON p.product_id = pv.product_id
    GROUP BY p.product_id, p.name
    ORDER BY units DESC
    LIMIT 6
"#;

const RECENT_ORDERS_SQL: &str = r#"
    SELECT
        o.order_id::text AS order_id,
        o.total_amount,
        o.order_status AS status,
        o.payment_status,
        o.created_at,
        c.name AS customer,
        (
            SELECT pv2.variant_name
            FROM order_items oi2
            JOIN product_variants pv2 ON pv2.variant_id = oi2.variant_id
            WHERE oi2.order_id = o.order_id
            LIMIT 1
        ) AS product
    FROM orders_table o
    LEFT JOIN customers c ON c.customer_id = o.customer_id
    ORDER BY o.created_at DESC
    LIMIT 10
"#;

const INVENTORY_ALERTS_SQL: &str = r#"
    SELECT pv.variant_id, pv.variant_name AS name, pv.sku, pv.stock_quantity AS stock
    FROM product_variants pv
    WHERE pv.stock_quantity < 15
    ORDER BY pv.stock_quantity ASC
    LIMIT 8
"#;

const ORDERS_BY_CHANNEL_SQL: &str = r#"
    SELECT channel, COUNT(*) AS cnt
    FROM orders_table
    GROUP BY channel
    ORDER BY cnt DESC
"#;

const AGE_GENDER_SQL: &str = r#"
    SELECT
        CASE
            WHEN age BETWEEN 18 AND 24 THEN '18–24'
            WHEN age BETWEEN 25 AND 34 THEN '25–34'
            WHEN age BETWEEN 35 AND 44 THEN '35–44'
            WHEN age BETWEEN 45 AND 54 THEN '45–54'
            ELSE '55+'
        END AS age_group,
        gender,
        COUNT(*) AS cnt
    FROM customers
    WHERE age IS NOT NULL AND gender IS NOT NULL
    GROUP BY age_group, gender
    ORDER BY age_group, gender
"#;

const GENDER_SPLIT_SQL: &str =
    "SELECT gender, COUNT(*) AS cnt FROM customers WHERE gender IS NOT NULL GROUP BY gender";

const GEO_REVENUE_SQL: &str = r#"
    SELECT c.city, COALESCE(SUM(o.total_amount), 0) AS revenue
    FROM orders_table o
    JOIN customers c ON c.customer_id = o.customer_id
    WHERE o.payment_status = 'PAID' AND c.city IS NOT NULL
    GROUP BY c.city
    ORDER BY revenue DESC
    LIMIT 6
"#;

const PAYMENT_METHODS_SQL: &str = r#"
    SELECT payment_method AS method, COUNT(*) AS cnt
    FROM orders_table
    WHERE payment_method IS NOT NULL
    GROUP BY payment_method
    ORDER BY cnt DESC
"#;

const SIZE_DISTRIBUTION_SQL: &str = r#"
    SELECT pv.size, COALESCE(SUM(oi.quantity), 0) AS count
    FROM order_items oi
    JOIN product_variants pv ON pv.variant_id = oi.variant_id
    WHERE pv.size IS NOT NULL
    GROUP BY pv.size
    ORDER BY pv.size::NUMERIC ASC
"#;

const ORDER_STATUS_SQL: &str = r#"
    SELECT order_status AS status, COUNT(*) AS cnt
    FROM orders_table
    GROUP BY order_status
    ORDER BY cnt DESC
"#;

pub const AGE_GROUPS: [&str; 5] = ["18–24", "25–34", "35–44", "45–54", "55+"];

const REORDER_LEVEL: i64 = 15;
const CRITICAL_STOCK: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiCard<T> {
    pub value: T,
    pub change: f64,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<&'static str>,
}

impl<T> KpiCard<T> {
    fn new(value: T, change: f64, trend: Trend) -> Self {
        Self {
            value,
            change,
            trend,
            prefix: None,
            suffix: None,
        }
    }

    fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_revenue: KpiCard<i64>,
    pub total_orders: KpiCard<i64>,
    pub active_customers: KpiCard<i64>,
    pub avg_order_value: KpiCard<i64>,
    pub return_rate: KpiCard<f64>,
    pub stock_units: KpiCard<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub revenue: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelShare {
    pub channel: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentShare {
    pub method: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub name: String,
    pub units: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub order_id: String,
    pub customer: String,
    pub product: String,
    pub amount: f64,
    pub status: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Low,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlert {
    pub name: String,
    pub sku: String,
    pub stock: i64,
    pub reorder_level: i64,
    pub status: AlertLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroup {
    pub group: &'static str,
    pub male: i64,
    pub female: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderSplit {
    pub male: i64,
    pub female: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age_groups: Vec<AgeGroup>,
    pub gender_split: GenderSplit,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityRevenue {
    pub city: String,
    pub revenue: f64,
    pub pct: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SizeCount {
    pub size: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub value: i64,
    pub color: &'static str,
}

async fn scalar(store: &dyn ReportStore, sql: &str) -> Result<f64> {
    let rows = store.fetch_rows(sql, Vec::new()).await?;
    Ok(rows.first().map(|row| number(row, "val")).unwrap_or(0.0))
}

pub async fn kpis(State(state): State<AppState>) -> Report<Kpis> {
    let store = state.store.as_ref();
    let (revenue, orders, customers, aov, stock, cancelled) = tokio::try_join!(
        scalar(store, PAID_REVENUE_SQL),
        scalar(store, ORDER_COUNT_SQL),
        scalar(store, CUSTOMER_COUNT_SQL),
        scalar(store, PAID_AOV_SQL),
        scalar(store, STOCK_UNITS_SQL),
        scalar(store, CANCELLED_COUNT_SQL),
    )?;

    let total_orders = orders.trunc() as i64;
    let return_rate = if total_orders > 0 {
        round_to(cancelled / orders * 100.0, 1)
    } else {
        0.0
    };

    Ok(Json(ApiResponse::ok(Kpis {
        total_revenue: KpiCard::new(revenue.round() as i64, 18.4, Trend::Up).prefix("₹"),
        total_orders: KpiCard::new(total_orders, 12.1, Trend::Up),
        active_customers: KpiCard::new(customers.trunc() as i64, 9.3, Trend::Up),
        avg_order_value: KpiCard::new(aov.round() as i64, -2.8, Trend::Down).prefix("₹"),
        return_rate: KpiCard::new(return_rate, -1.1, Trend::Down).suffix("%"),
        stock_units: KpiCard::new(stock.trunc() as i64, -5.6, Trend::Down),
    })))
}

pub async fn revenue_trend(State(state): State<AppState>) -> Report<Vec<TrendPoint>> {
    let rows = state.store.fetch_rows(REVENUE_TREND_SQL, Vec::new()).await?;
    let points = rows
        .iter()
        .map(|row| {
            let revenue = number(row, "revenue");
            TrendPoint {
                month: owned_text(row, "month"),
                revenue,
                target: revenue * 0.9,
            }
        })
        .collect();
    Ok(Json(ApiResponse::ok(points)))
}

/// `(label, share, color)` for each row, shares summing to ~100
fn shares(
    rows: &[JsonRow],
    label: &str,
    measure: &str,
    palette: &[&'static str],
) -> Vec<(String, f64, &'static str)> {
    let total: f64 = rows.iter().map(|row| number(row, measure)).sum();
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            (
                owned_text(row, label),
                percent_share(number(row, measure), total),
                cycle_color(palette, i),
            )
        })
        .collect()
}

pub async fn category_split(State(state): State<AppState>) -> Report<Vec<CategoryShare>> {
    let rows = state.store.fetch_rows(CATEGORY_SPLIT_SQL, Vec::new()).await?;
    let data = shares(&rows, "category", "revenue", CATEGORY_PALETTE)
        .into_iter()
        .map(|(category, value, color)| CategoryShare {
            category,
            value,
            color,
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

pub async fn top_products(State(state): State<AppState>) -> Report<Vec<TopProduct>> {
    let rows = state.store.fetch_rows(TOP_PRODUCTS_SQL, Vec::new()).await?;
    let data = rows
        .iter()
        .map(|row| TopProduct {
            name: owned_text(row, "name"),
            units: integer(row, "units"),
            revenue: number(row, "revenue"),
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

pub fn recent_order(row: &JsonRow) -> RecentOrder {
    RecentOrder {
        order_id: display_order_id(text(row, "order_id").unwrap_or_default()),
        customer: text(row, "customer").unwrap_or("Guest").to_string(),
        product: text(row, "product").unwrap_or("—").to_string(),
        amount: number(row, "total_amount"),
        status: title_case(text(row, "status").unwrap_or_default()),
        date: display_date(text(row, "created_at").unwrap_or_default()),
    }
}

pub async fn recent_orders(State(state): State<AppState>) -> Report<Vec<RecentOrder>> {
    let rows = state.store.fetch_rows(RECENT_ORDERS_SQL, Vec::new()).await?;
    Ok(Json(ApiResponse::ok(rows.iter().map(recent_order).collect())))
}

pub async fn inventory_alerts(State(state): State<AppState>) -> Report<Vec<InventoryAlert>> {
    let rows = state.store.fetch_rows(INVENTORY_ALERTS_SQL, Vec::new()).await?;
    let data = rows
        .iter()
        .map(|row| {
            let stock = integer(row, "stock");
            InventoryAlert {
                name: owned_text(row, "name"),
                sku: owned_text(row, "sku"),
                stock,
                reorder_level: REORDER_LEVEL,
                status: if stock <= CRITICAL_STOCK {
                    AlertLevel::Critical
                } else {
                    AlertLevel::Low
                },
            }
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

pub async fn orders_by_channel(State(state): State<AppState>) -> Report<Vec<ChannelShare>> {
    let rows = state.store.fetch_rows(ORDERS_BY_CHANNEL_SQL, Vec::new()).await?;
    let data = shares(&rows, "channel", "cnt", CHANNEL_PALETTE)
        .into_iter()
        .map(|(channel, value, color)| ChannelShare {
            channel,
            value,
            color,
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

fn is_male(row: &JsonRow) -> bool {
    text(row, "gender").is_some_and(|g| g.eq_ignore_ascii_case("male"))
}

/// Any gender other than `male` is counted as female
pub fn demographics(age_rows: &[JsonRow], gender_rows: &[JsonRow]) -> Demographics {
    let mut age_groups: Vec<AgeGroup> = AGE_GROUPS
        .iter()
        .map(|&group| AgeGroup {
            group,
            male: 0,
            female: 0,
        })
        .collect();

    for row in age_rows {
        let label = text(row, "age_group").unwrap_or_default();
        if let Some(bucket) = age_groups.iter_mut().find(|g| g.group == label) {
            let count = integer(row, "cnt");
            if is_male(row) {
                bucket.male = count;
            } else {
                bucket.female = count;
            }
        }
    }

    let (mut male, mut female) = (0, 0);
    for row in gender_rows {
        if is_male(row) {
            male = integer(row, "cnt");
        } else {
            female = integer(row, "cnt");
        }
    }
    let total = match male + female {
        0 => 1,
        n => n,
    };

    Demographics {
        age_groups,
        gender_split: GenderSplit {
            male: (male as f64 / total as f64 * 100.0).round() as i64,
            female: (female as f64 / total as f64 * 100.0).round() as i64,
        },
    }
}

pub async fn customer_demographics(State(state): State<AppState>) -> Report<Demographics> {
    let store = state.store.as_ref();
    let (age_rows, gender_rows) = tokio::try_join!(
        store.fetch_rows(AGE_GENDER_SQL, Vec::new()),
        store.fetch_rows(GENDER_SPLIT_SQL, Vec::new()),
    )?;
    Ok(Json(ApiResponse::ok(demographics(&age_rows, &gender_rows))))
}

pub async fn geo_revenue(State(state): State<AppState>) -> Report<Vec<CityRevenue>> {
    let rows = state.store.fetch_rows(GEO_REVENUE_SQL, Vec::new()).await?;
    // Rows are ordered by revenue, so the first one is the maximum
    let max = rows.first().map(|row| number(row, "revenue")).unwrap_or(1.0);
    let data = rows
        .iter()
        .map(|row| {
            let revenue = number(row, "revenue");
            let pct = if max > 0.0 {
                (revenue / max * 100.0).round() as i64
            } else {
                0
            };
            CityRevenue {
                city: owned_text(row, "city"),
                revenue,
                pct,
            }
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

pub async fn payment_methods(State(state): State<AppState>) -> Report<Vec<PaymentShare>> {
    let rows = state.store.fetch_rows(PAYMENT_METHODS_SQL, Vec::new()).await?;
    let data = shares(&rows, "method", "cnt", PAYMENT_PALETTE)
        .into_iter()
        .map(|(method, value, color)| PaymentShare {
            method,
            value,
            color,
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

pub async fn size_distribution(State(state): State<AppState>) -> Report<Vec<SizeCount>> {
    let rows = state.store.fetch_rows(SIZE_DISTRIBUTION_SQL, Vec::new()).await?;
    let data = rows
        .iter()
        .map(|row| SizeCount {
            size: owned_text(row, "size"),
            count: integer(row, "count"),
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

pub async fn order_status_breakdown(State(state): State<AppState>) -> Report<Vec<StatusCount>> {
    let rows = state.store.fetch_rows(ORDER_STATUS_SQL, Vec::new()).await?;
    let data = rows
        .iter()
        .map(|row| {
            let status = owned_text(row, "status");
            StatusCount {
                color: status_color(&status),
                value: integer(row, "cnt"),
                status,
            }
        })
        .collect();
    Ok(Json(ApiResponse::ok(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows(value: Value) -> Vec<JsonRow> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_shares_cycle_palette_and_round() {
        let data = rows(json!([
            {"channel": "web", "cnt": 2},
            {"channel": "app", "cnt": 1},
        ]));
        let result = shares(&data, "channel", "cnt", CHANNEL_PALETTE);
        assert_eq!(result[0], ("web".to_string(), 66.7, "#6C63FF"));
        assert_eq!(result[1], ("app".to_string(), 33.3, "#00C9A7"));
    }

    #[test]
    fn test_shares_with_zero_total() {
        let data = rows(json!([{"category": "Running", "revenue": "0"}]));
        let result = shares(&data, "category", "revenue", CATEGORY_PALETTE);
        assert_eq!(result[0].1, 0.0);
    }

    #[test]
    fn test_recent_order_fallbacks() {
        let data = rows(json!([{
            "order_id": "0d4f6b2c-aaaa-bbbb-cccc-0000001a2b3c",
            "total_amount": "4599.00",
            "status": "DELIVERED",
            "created_at": "2025-01-31T23:10:00+00:00",
            "customer": null,
            "product": null,
        }]));
        let order = recent_order(&data[0]);
        assert_eq!(order.order_id, "#SM1A2B3C");
        assert_eq!(order.customer, "Guest");
        assert_eq!(order.product, "—");
        assert_eq!(order.amount, 4599.0);
        assert_eq!(order.status, "Delivered");
        assert_eq!(order.date, "2025-01-31");
    }

    #[test]
    fn test_demographics_fills_every_group() {
        let age_rows = rows(json!([
            {"age_group": "25–34", "gender": "Male", "cnt": 4},
            {"age_group": "25–34", "gender": "Female", "cnt": 6},
            {"age_group": "unknown", "gender": "Male", "cnt": 99},
        ]));
        let gender_rows = rows(json!([
            {"gender": "male", "cnt": 1},
            {"gender": "female", "cnt": 2},
        ]));
        let result = demographics(&age_rows, &gender_rows);

        assert_eq!(result.age_groups.len(), 5);
        assert_eq!(
            result.age_groups[1],
            AgeGroup {
                group: "25–34",
                male: 4,
                female: 6
            }
        );
        assert_eq!(result.age_groups[0].male + result.age_groups[0].female, 0);
        assert_eq!(result.gender_split, GenderSplit { male: 33, female: 67 });
    }

    #[test]
    fn test_demographics_without_customers() {
        let result = demographics(&[], &[]);
        assert_eq!(result.gender_split, GenderSplit { male: 0, female: 0 });
    }

    #[test]
    fn test_kpi_card_serialization_omits_absent_affixes() {
        let card = serde_json::to_value(KpiCard::new(12, 12.1, Trend::Up)).unwrap();
        assert_eq!(card, json!({"value": 12, "change": 12.1, "trend": "up"}));

        let card = serde_json::to_value(KpiCard::new(3.5, -1.1, Trend::Down).suffix("%")).unwrap();
        assert_eq!(
            card,
            json!({"value": 3.5, "change": -1.1, "trend": "down", "suffix": "%"})
        );
    }
}
