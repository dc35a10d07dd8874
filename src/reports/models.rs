use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Quantity sold for one pizza type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PizzaTypeQuantity {
    #[schema(example = "The Classic Deluxe Pizza")]
    pub pizza_type: String,
    pub quantity_sold: i64,
}

/// Response for GET /api/reports/sales-summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_orders: i64,
    pub total_pizzas_sold: i64,
    #[schema(value_type = String, example = "817860.05")]
    pub total_sales: Decimal,
    /// total sales / total orders, 0 when there are no orders
    #[schema(value_type = String, example = "38.31")]
    pub average_order_value: Decimal,
    /// Five best-selling pizza types by quantity
    pub top_pizza_types: Vec<PizzaTypeQuantity>,
}

/// One day of GET /api/reports/daily-sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub total_orders: i64,
    pub total_pizzas_sold: i64,
    #[schema(value_type = String)]
    pub total_sales: Decimal,
}

/// One entry of GET /api/reports/top-pizzas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopPizza {
    pub pizza_name: String,
    pub quantity_sold: i64,
    #[schema(value_type = String)]
    pub total_sales: Decimal,
}

/// One entry of GET /api/reports/pizza-sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizePopularity {
    #[schema(example = "L")]
    pub size: String,
    pub quantity_sold: i64,
    #[schema(value_type = String)]
    pub total_sales: Decimal,
}

/// One entry of GET /api/reports/top-pizza-types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PizzaTypeRevenue {
    pub pizza_type: String,
    pub quantity_sold: i64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
}
