// HTTP handlers for the read endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{ListQuery, Order, OrderDetail, Pizza, PizzaType};

/// Handler for GET /api/orders
/// Lists orders by id, optionally limited
#[utoipa::path(
    get,
    path = "/api/orders",
    params(ListQuery),
    responses(
        (status = 200, description = "Orders ordered by id", body = Vec<Order>),
        (status = 400, description = "Invalid limit", body = String, example = json!({"error_code": "VALIDATION_ERROR"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    query.validate()?;

    let orders = state.catalog.list_orders(query.limit()).await?;
    tracing::debug!("Returning {} orders", orders.len());
    Ok(Json(orders))
}

/// Handler for GET /api/orders/:id
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found", body = String, example = json!({"message": "Order with ID '1' not found."})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Order>, ApiError> {
    tracing::debug!("Fetching order with id: {}", id);

    let order = state
        .catalog
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", id))?;
    Ok(Json(order))
}

/// Handler for GET /api/orderdetails
#[utoipa::path(
    get,
    path = "/api/orderdetails",
    params(ListQuery),
    responses(
        (status = 200, description = "Order details ordered by id", body = Vec<OrderDetail>),
        (status = 400, description = "Invalid limit", body = String, example = json!({"error_code": "VALIDATION_ERROR"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "orders"
)]
pub async fn list_order_details(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OrderDetail>>, ApiError> {
    query.validate()?;

    let details = state.catalog.list_order_details(query.limit()).await?;
    tracing::debug!("Returning {} order details", details.len());
    Ok(Json(details))
}

/// Handler for GET /api/orderdetails/:id
#[utoipa::path(
    get,
    path = "/api/orderdetails/{id}",
    params(
        ("id" = i32, Path, description = "Order detail ID")
    ),
    responses(
        (status = 200, description = "Order detail found", body = OrderDetail),
        (status = 404, description = "Order detail not found", body = String, example = json!({"message": "OrderDetail with ID '1' not found."})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "orders"
)]
pub async fn get_order_detail(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetail>, ApiError> {
    let detail = state
        .catalog
        .get_order_detail(id)
        .await?
        .ok_or_else(|| ApiError::not_found("OrderDetail", id))?;
    Ok(Json(detail))
}

/// Handler for GET /api/pizzatypes
#[utoipa::path(
    get,
    path = "/api/pizzatypes",
    params(ListQuery),
    responses(
        (status = 200, description = "Pizza types ordered by id", body = Vec<PizzaType>),
        (status = 400, description = "Invalid limit", body = String, example = json!({"error_code": "VALIDATION_ERROR"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "pizzas"
)]
pub async fn list_pizza_types(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PizzaType>>, ApiError> {
    query.validate()?;
    Ok(Json(state.catalog.list_pizza_types(query.limit()).await?))
}

/// Handler for GET /api/pizzatypes/:id
#[utoipa::path(
    get,
    path = "/api/pizzatypes/{id}",
    params(
        ("id" = String, Path, description = "Pizza type ID")
    ),
    responses(
        (status = 200, description = "Pizza type found", body = PizzaType),
        (status = 404, description = "Pizza type not found", body = String, example = json!({"message": "PizzaType with ID 'bbq_ckn' not found."})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "pizzas"
)]
pub async fn get_pizza_type(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<PizzaType>, ApiError> {
    let pizza_type = state
        .catalog
        .get_pizza_type(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("PizzaType", &id))?;
    Ok(Json(pizza_type))
}

/// Handler for GET /api/pizzas
#[utoipa::path(
    get,
    path = "/api/pizzas",
    params(ListQuery),
    responses(
        (status = 200, description = "Pizzas ordered by id", body = Vec<Pizza>),
        (status = 400, description = "Invalid limit", body = String, example = json!({"error_code": "VALIDATION_ERROR"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "pizzas"
)]
pub async fn list_pizzas(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Pizza>>, ApiError> {
    query.validate()?;
    Ok(Json(state.catalog.list_pizzas(query.limit()).await?))
}

/// Handler for GET /api/pizzas/:id
#[utoipa::path(
    get,
    path = "/api/pizzas/{id}",
    params(
        ("id" = String, Path, description = "Pizza ID")
    ),
    responses(
        (status = 200, description = "Pizza found", body = Pizza),
        (status = 404, description = "Pizza not found", body = String, example = json!({"message": "Pizza with ID 'bbq_ckn_s' not found."})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error_code": "DATABASE_ERROR"}))
    ),
    tag = "pizzas"
)]
pub async fn get_pizza(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pizza>, ApiError> {
    let pizza = state
        .catalog
        .get_pizza(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pizza", &id))?;
    Ok(Json(pizza))
}
