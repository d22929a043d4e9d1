pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use crate::db::source::RecordSource;

pub use handlers::{health_check, AppState, ErrorResponse};

/// 报表路由
pub fn router<S: RecordSource + 'static>(state: AppState<S>) -> Router {
    let reports = Router::new()
        .route("/dashboard", get(handlers::dashboard::<S>))
        .route("/product-sales", get(handlers::product_sales::<S>))
        .route("/product-sales.csv", get(handlers::product_sales_csv::<S>))
        .route("/product-returns", get(handlers::product_returns::<S>))
        .route("/inactive-customers", get(handlers::inactive_customers::<S>))
        .route("/receivables", get(handlers::receivables::<S>))
        .route("/customers", get(handlers::customer_summaries::<S>))
        .route("/salespersons", get(handlers::salesperson_summaries::<S>))
        .route("/inventory-movements", get(handlers::inventory_movements::<S>));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/reports", reports)
        .route("/api/cache/invalidate/:entity", post(handlers::invalidate_cache::<S>))
        .layer(ServiceBuilder::new())
        .with_state(state)
}
