//! HTTP surface
//!
//! Routes every dashboard report onto a handler and wraps the router in the
//! CORS, compression, timeout, concurrency and request-id layers.

pub mod health;
pub mod lists;
pub mod middleware;
pub mod overview;
pub mod params;
pub mod sales;
pub mod shaping;
pub mod state;

use axum::{middleware::from_fn, routing::get, Router};
use http::{header, HeaderValue, Method};
use std::time::Duration;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use tracing::warn;

use config::ServerConfig;
pub use state::AppState;

/// Dashboard routes, mounted under `/api/dashboard`
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/kpis", get(overview::kpis))
        .route("/revenue-trend", get(overview::revenue_trend))
        .route("/category-split", get(overview::category_split))
        .route("/top-products", get(overview::top_products))
        .route("/recent-orders", get(overview::recent_orders))
        .route("/inventory-alerts", get(overview::inventory_alerts))
        .route("/orders-by-channel", get(overview::orders_by_channel))
        .route("/customer-demographics", get(overview::customer_demographics))
        .route("/geo-revenue", get(overview::geo_revenue))
        .route("/payment-methods", get(overview::payment_methods))
        .route("/size-distribution", get(overview::size_distribution))
        .route("/order-status-breakdown", get(overview::order_status_breakdown))
        .route("/orders-list", get(lists::orders_list))
        .route("/products-list", get(lists::products_list))
        .route("/customers-list", get(lists::customers_list))
        .route("/inventory-list", get(lists::inventory_list))
        .route("/sales-summary", get(sales::sales_summary))
}

/// Unlayered router; the 404 fallback answers every unknown path
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/api", get(health::home))
        .route("/api/health", get(health::status))
        .nest("/api/dashboard", dashboard_routes())
        .fallback(health::not_found)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Fully layered application, ready for `axum::serve`
///
/// `Router::layer` wraps each route separately, so the concurrency cap uses a
/// global limit whose semaphore is shared by every route.
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    routes()
        .layer(from_fn(middleware::logging_middleware))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&server.cors_origins))
        .layer(TimeoutLayer::new(Duration::from_secs(server.timeout_seconds)))
        .layer(GlobalConcurrencyLimitLayer::new(server.max_concurrent_requests))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
