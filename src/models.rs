use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A pizza recipe family, e.g. "The Barbecue Chicken Pizza"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PizzaType {
    #[schema(example = "bbq_ckn")]
    pub id: String,
    #[schema(example = "The Barbecue Chicken Pizza")]
    pub name: String,
    #[schema(example = "Chicken")]
    pub category: String,
    /// Comma-separated ingredient list
    #[schema(example = "Barbecued Chicken, Red Peppers, Green Peppers, Tomatoes")]
    pub ingredients: String,
}

/// A sellable pizza: one pizza type in one size at one price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
    #[schema(example = "bbq_ckn_s")]
    pub id: String,
    #[schema(example = "bbq_ckn")]
    pub pizza_type_id: String,
    #[schema(example = "S")]
    pub size: String,
    #[schema(value_type = String, example = "12.75")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(example = 1)]
    pub id: i32,
    /// Order date and time of day, stored as UTC
    pub order_date: DateTime<Utc>,
}

/// One line of an order: a quantity of a single pizza
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub order_id: i32,
    #[schema(example = "hawaiian_m")]
    pub pizza_id: String,
    #[schema(example = 1)]
    pub quantity: i32,
}

/// Order detail joined with its order, pizza and pizza type.
///
/// This is the input of every sales report.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SalesLine {
    pub order_id: i32,
    pub order_date: DateTime<Utc>,
    pub pizza_type_name: String,
    pub size: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl SalesLine {
    /// quantity × unit price, saturating at the decimal range
    pub fn revenue(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.price)
    }
}

/// Query parameters accepted by every list endpoint
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum number of rows to return; all rows when omitted
    #[validate(range(min = 0, message = "limit must not be negative"))]
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn limit(&self) -> Option<usize> {
        self.limit.map(|l| l.max(0) as usize)
    }
}
