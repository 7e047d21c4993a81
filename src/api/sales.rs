use axum::{extract::State, Json};
use serde::Serialize;

use super::state::AppState;
use crate::errors::Result;
use crate::store::JsonRow;
use report_query::ApiResponse;

const MONTHLY_SQL: &str = r#"
    SELECT
        TO_CHAR(DATE_TRUNC('month', created_at), 'Mon YYYY') AS month,
        COUNT(*) AS orders,
        COALESCE(SUM(CASE WHEN payment_status = 'PAID' THEN total_amount ELSE 0 END), 0) AS revenue,
        COALESCE(AVG(CASE WHEN payment_status = 'PAID' THEN total_amount ELSE NULL END), 0) AS "avgOrder"
    FROM orders_table
    GROUP BY DATE_TRUNC('month', created_at)
    ORDER BY DATE_TRUNC('month', created_at)
"#;

const DAILY_SQL: &str = r#"
    SELECT
        TO_CHAR(created_at::date, 'DD Mon') AS day,
        COUNT(*) AS orders,
        COALESCE(SUM(CASE WHEN payment_status = 'PAID' THEN total_amount ELSE 0 END), 0) AS revenue
    FROM orders_table
    WHERE created_at >= NOW() - INTERVAL '30 days'
    GROUP BY created_at::date
    ORDER BY created_at::date
"#;

const BY_CATEGORY_SQL: &str = r#"
    SELECT
        p.category,
        COUNT(DISTINCT o.order_id) AS orders,
        COALESCE(SUM(oi.quantity * oi.price_at_purchase), 0) AS revenue,
        COALESCE(SUM(oi.quantity), 0) AS units
    FROM order_items oi
    JOIN product_variants pv ON pv.variant_id = oi.variant_id
    JOIN products_table p ON p.product_id = pv.product_id
    JOIN orders_table o ON o.order_id = oi.order_id
    GROUP BY p.category
    ORDER BY revenue DESC
"#;

const TOP_CUSTOMERS_SQL: &str = r#"
    SELECT
        c.name,
        c.city,
        COUNT(o.order_id) AS orders,
        COALESCE(SUM(CASE WHEN o.payment_status = 'PAID' THEN o.total_amount ELSE 0 END), 0) AS spent
    FROM customers c
    JOIN orders_table o ON o.customer_id = c.customer_id
    GROUP BY c.customer_id, c.name, c.city
    ORDER BY spent DESC
    LIMIT 10
"#;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub monthly: Vec<JsonRow>,
    pub daily: Vec<JsonRow>,
    pub by_category: Vec<JsonRow>,
    pub top_customers: Vec<JsonRow>,
}

pub async fn sales_summary(State(state): State<AppState>) -> Result<Json<ApiResponse<SalesSummary>>> {
    let store = state.store.as_ref();
    let (monthly, daily, by_category, top_customers) = tokio::try_join!(
        store.fetch_rows(MONTHLY_SQL, Vec::new()),
        store.fetch_rows(DAILY_SQL, Vec::new()),
        store.fetch_rows(BY_CATEGORY_SQL, Vec::new()),
        store.fetch_rows(TOP_CUSTOMERS_SQL, Vec::new()),
    )?;

    Ok(Json(ApiResponse::ok(SalesSummary {
        monthly,
        daily,
        by_category,
        top_customers,
    })))
}
