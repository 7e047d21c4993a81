//! Paginated list screens
//!
//! Every list runs the same protocol: build the filters, snapshot the params
//! for the count query, then append LIMIT/OFFSET for the data query. The count
//! therefore always reflects the filtered set regardless of the page asked for.

use axum::{extract::State, Json};

use super::params::QueryParams;
use super::state::AppState;
use crate::errors::Result;
use crate::store::{JsonRow, ReportStore};
use report_query::query_builder::sql_generation::SqlGenerator;
use report_query::{
    paginated_response, parse_pagination, PageRequest, Paginated, QueryBuilder,
    SortWhitelist,
};

type ListResponse = Result<Json<Paginated<JsonRow>>>;

pub const PRODUCT_SORTS: SortWhitelist = SortWhitelist::new(
    &[
        ("name", "p.name"),
        ("price", "p.base_price"),
        ("totalStock", "\"totalStock\""),
        ("unitsSold", "\"unitsSold\""),
        ("totalRevenue", "\"totalRevenue\""),
    ],
    "\"totalRevenue\"",
);

pub const CUSTOMER_SORTS: SortWhitelist = SortWhitelist::new(
    &[
        ("name", "c.name"),
        ("totalOrders", "\"totalOrders\""),
        ("totalSpent", "\"totalSpent\""),
        ("age", "c.age"),
    ],
    "\"totalSpent\"",
);

/// Product `stockLevel` filter over the summed variant stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Out,
    Low,
    InStock,
}

impl StockLevel {
    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        match raw? {
            "out" => Some(Self::Out),
            "low" => Some(Self::Low),
            "in_stock" => Some(Self::InStock),
            _ => None,
        }
    }

    pub fn predicates(self) -> &'static [&'static str] {
        match self {
            Self::Out => &["COALESCE(SUM(pv.stock_quantity), 0) = 0"],
            Self::Low => &[
                "COALESCE(SUM(pv.stock_quantity), 0) > 0",
                "COALESCE(SUM(pv.stock_quantity), 0) < 20",
            ],
            Self::InStock => &["COALESCE(SUM(pv.stock_quantity), 0) >= 20"],
        }
    }
}

/// Inventory `status` filter over a single variant's stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryStatus {
    Healthy,
    Low,
    Critical,
    OutOfStock,
}

impl InventoryStatus {
    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        match raw? {
            "healthy" => Some(Self::Healthy),
            "low" => Some(Self::Low),
            "critical" => Some(Self::Critical),
            "out_of_stock" => Some(Self::OutOfStock),
            _ => None,
        }
    }

    pub fn predicates(self) -> &'static [&'static str] {
        match self {
            Self::Healthy => &["pv.stock_quantity >= 30"],
            Self::Low => &["pv.stock_quantity >= 10", "pv.stock_quantity < 30"],
            Self::Critical => &["pv.stock_quantity > 0", "pv.stock_quantity < 10"],
            Self::OutOfStock => &["pv.stock_quantity = 0"],
        }
    }
}

fn having_clause(predicates: Option<&'static [&'static str]>) -> String {
    SqlGenerator::build_having_clause(predicates.unwrap_or_default())
}

#[derive(Debug, Default)]
pub struct OrderListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub channel: Option<String>,
}

impl From<&QueryParams> for OrderListQuery {
    fn from(params: &QueryParams) -> Self {
        Self {
            search: params.owned("search"),
            status: params.owned("status"),
            channel: params.owned("channel"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub stock_level: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl From<&QueryParams> for ProductListQuery {
    fn from(params: &QueryParams) -> Self {
        Self {
            search: params.owned("search"),
            category: params.owned("category"),
            stock_level: params.owned("stockLevel"),
            sort_by: params.owned("sortBy"),
            sort_order: params.owned("sortOrder"),
        }
    }
}

#[derive(Debug, Default)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl From<&QueryParams> for CustomerListQuery {
    fn from(params: &QueryParams) -> Self {
        Self {
            search: params.owned("search"),
            gender: params.owned("gender"),
            city: params.owned("city"),
            sort_by: params.owned("sortBy"),
            sort_order: params.owned("sortOrder"),
        }
    }
}

#[derive(Debug, Default)]
pub struct InventoryListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

impl From<&QueryParams> for InventoryListQuery {
    fn from(params: &QueryParams) -> Self {
        Self {
            search: params.owned("search"),
            status: params.owned("status"),
            category: params.owned("category"),
        }
    }
}

/// Run the count query on the filter params, then the data query on the
/// filter params plus LIMIT/OFFSET
async fn run_paginated(
    store: &dyn ReportStore,
    builder: &mut QueryBuilder,
    page: PageRequest,
    count_sql: &str,
    data_sql: impl FnOnce(&str) -> String,
) -> ListResponse {
    let count_params = builder.params();
    let total = store.fetch_count(count_sql, count_params).await?;

    let pagination_clause = builder.add_pagination(page.limit, page.offset);
    let sql = data_sql(&pagination_clause);
    let rows = store.fetch_rows(&sql, builder.params()).await?;

    crate::debug_log!(
        "[LISTS] page {} of {} rows, total {}",
        page.page,
        rows.len(),
        total
    );
    Ok(Json(paginated_response(rows, total, page.page, page.limit)))
}

pub async fn orders_list(
    State(state): State<AppState>,
    params: QueryParams,
) -> ListResponse {
    let filters = OrderListQuery::from(&params);
    let page = parse_pagination(&params.pagination(), &state.pagination);

    let mut builder = QueryBuilder::new();
    builder
        .add_search(&["c.name", "o.order_id::text"], filters.search.as_deref())
        .add_condition("o.order_status = $?", filters.status)
        .add_condition("o.channel = $?", filters.channel);
    let where_clause = builder.where_clause();

    let count_sql = format!(
        "SELECT COUNT(*) FROM orders_table o \
         LEFT JOIN customers c ON c.customer_id = o.customer_id {where_clause}"
    );

    run_paginated(state.store.as_ref(), &mut builder, page, &count_sql, |pagination| {
        format!(
            r#"SELECT
                o.order_id,
                o.order_id::text AS "orderId",
                c.name AS customer,
                c.email,
                c.city,
                (SELECT p2.name FROM order_items oi2
                 JOIN product_variants pv2 ON pv2.variant_id = oi2.variant_id
                 JOIN products_table p2 ON p2.product_id = pv2.product_id
                 WHERE oi2.order_id = o.order_id LIMIT 1) AS product,
                (SELECT SUM(oi2.quantity) FROM order_items oi2 WHERE oi2.order_id = o.order_id) AS quantity,
                o.total_amount AS amount,
                o.order_status AS status,
                o.payment_status AS "paymentStatus",
                o.channel,
                o.payment_method AS "paymentMethod",
                TO_CHAR(o.created_at, 'YYYY-MM-DD') AS date,
                TO_CHAR(o.created_at, 'HH24:MI') AS time
            FROM orders_table o
            LEFT JOIN customers c ON c.customer_id = o.customer_id
            {where_clause}
            ORDER BY o.created_at DESC
            {pagination}"#
        )
    })
    .await
}

const PRODUCT_FROM: &str = "FROM products_table p \
     LEFT JOIN product_variants pv ON pv.product_id = p.product_id \
     LEFT JOIN order_items oi ON oi.variant_id = pv.variant_id";

pub async fn products_list(
    State(state): State<AppState>,
    params: QueryParams,
) -> ListResponse {
    let filters = ProductListQuery::from(&params);
    let page = parse_pagination(&params.pagination(), &state.pagination);

    let mut builder = QueryBuilder::new();
    builder
        .add_search(&["p.name", "p.description"], filters.search.as_deref())
        .add_condition("p.category = $?", filters.category);
    let where_clause = builder.where_clause();
    let having = having_clause(
        StockLevel::from_query(filters.stock_level.as_deref()).map(StockLevel::predicates),
    );
    let order = PRODUCT_SORTS.order_clause(filters.sort_by.as_deref(), filters.sort_order.as_deref());

    let count_sql = format!(
        "SELECT COUNT(*) FROM (SELECT p.product_id {PRODUCT_FROM} {where_clause} \
         GROUP BY p.product_id {having}) sub"
    );

    run_paginated(state.store.as_ref(), &mut builder, page, &count_sql, |pagination| {
        format!(
            r#"SELECT
                p.product_id AS id, p.name, p.description, p.category, p.base_price AS price,
                COUNT(DISTINCT pv.variant_id) AS "variantCount",
                COALESCE(SUM(pv.stock_quantity), 0) AS "totalStock",
                COALESCE(SUM(oi.quantity), 0) AS "unitsSold",
                COALESCE(SUM(oi.quantity * oi.price_at_purchase), 0) AS "totalRevenue",
                CASE WHEN SUM(oi.quantity) > 0
                    THEN ROUND(SUM(oi.quantity * oi.price_at_purchase) / SUM(oi.quantity))
                    ELSE p.base_price END AS "avgPrice",
                TO_CHAR(p.created_at, 'YYYY-MM-DD') AS "createdAt",
                ARRAY_AGG(DISTINCT pv.size) FILTER (WHERE pv.size IS NOT NULL) AS sizes
            {PRODUCT_FROM}
            {where_clause}
            GROUP BY p.product_id
            {having}
            {order}
            {pagination}"#
        )
    })
    .await
}

pub async fn customers_list(
    State(state): State<AppState>,
    params: QueryParams,
) -> ListResponse {
    let filters = CustomerListQuery::from(&params);
    let page = parse_pagination(&params.pagination(), &state.pagination);

    let mut builder = QueryBuilder::new();
    builder
        .add_search(&["c.name", "c.email", "c.city"], filters.search.as_deref())
        .add_condition("c.gender = $?", filters.gender)
        .add_condition("c.city = $?", filters.city);
    let where_clause = builder.where_clause();
    let order = CUSTOMER_SORTS.order_clause(filters.sort_by.as_deref(), filters.sort_order.as_deref());

    let count_sql = format!("SELECT COUNT(*) FROM customers c {where_clause}");

    run_paginated(state.store.as_ref(), &mut builder, page, &count_sql, |pagination| {
        format!(
            r#"SELECT
                c.customer_id AS id, c.name, c.email, c.phone, c.city, c.gender, c.age,
                COUNT(o.order_id) AS "totalOrders",
                COALESCE(SUM(CASE WHEN o.payment_status = 'PAID' THEN o.total_amount ELSE 0 END), 0) AS "totalSpent",
                COALESCE(AVG(CASE WHEN o.payment_status = 'PAID' THEN o.total_amount ELSE NULL END), 0) AS "avgOrderValue",
                TO_CHAR(MAX(o.created_at), 'YYYY-MM-DD') AS "lastOrder",
                TO_CHAR(c.created_at, 'YYYY-MM-DD') AS "joinedDate"
            FROM customers c
            LEFT JOIN orders_table o ON o.customer_id = c.customer_id
            {where_clause}
            GROUP BY c.customer_id
            {order}
            {pagination}"#
        )
    })
    .await
}

const INVENTORY_FROM: &str = "FROM product_variants pv \
     JOIN products_table p ON p.product_id = pv.product_id \
     LEFT JOIN order_items oi ON oi.variant_id = pv.variant_id";

pub async fn inventory_list(
    State(state): State<AppState>,
    params: QueryParams,
) -> ListResponse {
    let filters = InventoryListQuery::from(&params);
    let page = parse_pagination(&params.pagination(), &state.pagination);

    let mut builder = QueryBuilder::new();
    builder
        .add_search(&["p.name", "pv.sku"], filters.search.as_deref())
        .add_condition("p.category = $?", filters.category);
    let where_clause = builder.where_clause();
    let having = having_clause(
        InventoryStatus::from_query(filters.status.as_deref()).map(InventoryStatus::predicates),
    );

    let count_sql = format!(
        "SELECT COUNT(*) FROM (SELECT pv.variant_id {INVENTORY_FROM} {where_clause} \
         GROUP BY pv.variant_id, p.name, p.category {having}) sub"
    );

    run_paginated(state.store.as_ref(), &mut builder, page, &count_sql, |pagination| {
        format!(
            r#"SELECT
                pv.variant_id AS id, p.name AS product, p.category, pv.size, pv.sku, pv.price,
                pv.stock_quantity AS stock,
                COALESCE(SUM(oi.quantity), 0) AS "unitsSold",
                CASE
                    WHEN pv.stock_quantity = 0 THEN 'out_of_stock'
                    WHEN pv.stock_quantity < 10 THEN 'critical'
                    WHEN pv.stock_quantity < 30 THEN 'low'
                    ELSE 'healthy'
                END AS status
            {INVENTORY_FROM}
            {where_clause}
            GROUP BY pv.variant_id, p.name, p.category
            {having}
            ORDER BY pv.stock_quantity ASC
            {pagination}"#
        )
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_level_parsing() {
        assert_eq!(StockLevel::from_query(Some("out")), Some(StockLevel::Out));
        assert_eq!(StockLevel::from_query(Some("in_stock")), Some(StockLevel::InStock));
        assert_eq!(StockLevel::from_query(Some("LOW")), None);
        assert_eq!(StockLevel::from_query(Some("All")), None);
        assert_eq!(StockLevel::from_query(None), None);
    }

    #[test]
    fn test_stock_level_having() {
        assert_eq!(
            having_clause(Some(StockLevel::Low.predicates())),
            "HAVING COALESCE(SUM(pv.stock_quantity), 0) > 0 AND COALESCE(SUM(pv.stock_quantity), 0) < 20"
        );
        assert_eq!(having_clause(None), "");
    }

    #[test]
    fn test_inventory_status_bounds() {
        assert_eq!(
            having_clause(Some(InventoryStatus::Low.predicates())),
            "HAVING pv.stock_quantity >= 10 AND pv.stock_quantity < 30"
        );
        assert_eq!(
            having_clause(Some(InventoryStatus::Critical.predicates())),
            "HAVING pv.stock_quantity > 0 AND pv.stock_quantity < 10"
        );
        assert_eq!(
            having_clause(Some(InventoryStatus::OutOfStock.predicates())),
            "HAVING pv.stock_quantity = 0"
        );
        assert_eq!(InventoryStatus::from_query(Some("All")), None);
        assert_eq!(InventoryStatus::from_query(Some("bogus")), None);
    }

    #[test]
    fn test_sort_whitelists() {
        assert_eq!(PRODUCT_SORTS.resolve(Some("price")), "p.base_price");
        assert_eq!(PRODUCT_SORTS.resolve(Some("p.name; DROP TABLE x")), "\"totalRevenue\"");
        assert_eq!(
            CUSTOMER_SORTS.order_clause(Some("age"), Some("asc")),
            "ORDER BY c.age ASC"
        );
        assert_eq!(
            CUSTOMER_SORTS.order_clause(None, None),
            "ORDER BY \"totalSpent\" DESC"
        );
    }
}
