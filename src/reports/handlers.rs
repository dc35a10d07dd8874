// HTTP handlers for the sales reports

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::reports::{DailySales, PizzaTypeRevenue, SalesSummary, SizePopularity, TopPizza};

/// Handler for GET /api/reports/sales-summary
/// Totals, average order value and the five best-selling pizza types
#[utoipa::path(
    get,
    path = "/api/reports/sales-summary",
    responses(
        (status = 200, description = "Sales summary", body = SalesSummary),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "reports"
)]
pub async fn get_sales_summary(
    State(state): State<crate::AppState>,
) -> Result<Json<SalesSummary>, ApiError> {
    let summary = state.reports.sales_summary().await?;
    Ok(Json(summary.as_ref().clone()))
}

/// Handler for GET /api/reports/daily-sales
#[utoipa::path(
    get,
    path = "/api/reports/daily-sales",
    responses(
        (status = 200, description = "Sales per day, newest first", body = Vec<DailySales>),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "reports"
)]
pub async fn get_daily_sales(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<DailySales>>, ApiError> {
    let days = state.reports.daily_sales().await?;
    tracing::debug!("Daily sales report covers {} days", days.len());
    Ok(Json(days))
}

/// Handler for GET /api/reports/top-pizzas
#[utoipa::path(
    get,
    path = "/api/reports/top-pizzas",
    responses(
        (status = 200, description = "Ten best-selling pizzas by quantity", body = Vec<TopPizza>),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "reports"
)]
pub async fn get_top_pizzas(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<TopPizza>>, ApiError> {
    Ok(Json(state.reports.top_pizzas().await?))
}

/// Handler for GET /api/reports/pizza-sizes
#[utoipa::path(
    get,
    path = "/api/reports/pizza-sizes",
    responses(
        (status = 200, description = "Quantity and sales per pizza size", body = Vec<SizePopularity>),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "reports"
)]
pub async fn get_pizza_sizes(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<SizePopularity>>, ApiError> {
    Ok(Json(state.reports.pizza_sizes().await?))
}

/// Handler for GET /api/reports/top-pizza-types
#[utoipa::path(
    get,
    path = "/api/reports/top-pizza-types",
    responses(
        (status = 200, description = "Five pizza types with the highest revenue", body = Vec<PizzaTypeRevenue>),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "reports"
)]
pub async fn get_top_pizza_types(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<PizzaTypeRevenue>>, ApiError> {
    Ok(Json(state.reports.top_pizza_types().await?))
}
