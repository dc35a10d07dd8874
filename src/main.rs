pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod reports;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cache::ReadCache;
use catalog::CatalogService;
use config::AppConfig;
use import::{ImportMetricsRecorder, ImportService};
use reports::ReportService;
use store::{PgPizzaStore, PizzaStore};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        catalog::handlers::list_orders,
        catalog::handlers::get_order,
        catalog::handlers::list_order_details,
        catalog::handlers::get_order_detail,
        catalog::handlers::list_pizza_types,
        catalog::handlers::get_pizza_type,
        catalog::handlers::list_pizzas,
        catalog::handlers::get_pizza,
        reports::handlers::get_sales_summary,
        reports::handlers::get_daily_sales,
        reports::handlers::get_top_pizzas,
        reports::handlers::get_pizza_sizes,
        reports::handlers::get_top_pizza_types,
        import::handlers::import_csv,
        import::handlers::get_import_metrics,
    ),
    components(
        schemas(
            models::Order,
            models::OrderDetail,
            models::Pizza,
            models::PizzaType,
            reports::SalesSummary,
            reports::PizzaTypeQuantity,
            reports::DailySales,
            reports::TopPizza,
            reports::SizePopularity,
            reports::PizzaTypeRevenue,
            import::ImportResponse,
            import::ImportSummary,
            import::SkippedRow,
            import::SkipReason,
            import::ImportMetrics,
        )
    ),
    tags(
        (name = "orders", description = "Orders and order details"),
        (name = "pizzas", description = "Pizzas and pizza types"),
        (name = "reports", description = "Sales reports"),
        (name = "import", description = "Bulk CSV import")
    ),
    info(
        title = "Pizza Sales API",
        version = "1.0.0",
        description = "Read, report on and bulk import pizza sales data"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub reports: ReportService,
    pub imports: ImportService,
}

impl AppState {
    /// Wire every service onto one store with a shared read cache and a
    /// fresh metrics recorder
    pub fn new(store: Arc<dyn PizzaStore>, cache_ttl: Duration, batch_size: usize) -> Self {
        let cache = Arc::new(ReadCache::new(cache_ttl));
        Self {
            catalog: CatalogService::new(store.clone(), cache.clone()),
            reports: ReportService::new(store.clone(), cache),
            imports: ImportService::new(store, batch_size, ImportMetricsRecorder::new()),
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Read endpoints
        .route("/api/orders", get(catalog::list_orders))
        .route("/api/orders/:id", get(catalog::get_order))
        .route("/api/orderdetails", get(catalog::list_order_details))
        .route("/api/orderdetails/:id", get(catalog::get_order_detail))
        .route("/api/pizzatypes", get(catalog::list_pizza_types))
        .route("/api/pizzatypes/:id", get(catalog::get_pizza_type))
        .route("/api/pizzas", get(catalog::list_pizzas))
        .route("/api/pizzas/:id", get(catalog::get_pizza))
        // Reports
        .route("/api/reports/sales-summary", get(reports::get_sales_summary))
        .route("/api/reports/daily-sales", get(reports::get_daily_sales))
        .route("/api/reports/top-pizzas", get(reports::get_top_pizzas))
        .route("/api/reports/pizza-sizes", get(reports::get_pizza_sizes))
        .route("/api/reports/top-pizza-types", get(reports::get_top_pizza_types))
        // Import
        .route("/api/import/:kind", post(import::import_csv))
        .route("/api/import/metrics/:kind", get(import::get_import_metrics))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Pizza Sales API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to create database pool");

    let store: Arc<dyn PizzaStore> = Arc::new(PgPizzaStore::new(db_pool));
    let state = AppState::new(store, config.cache_ttl, config.import_batch_size);
    let app = create_router(state, config.max_upload_bytes);

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Pizza Sales API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
