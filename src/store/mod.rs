// Relational store access for the four pizza-sales tables.
//
// Handlers and services only see the `PizzaStore` trait; the PostgreSQL
// implementation lives in `postgres`, tests run against `memory`.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use std::collections::HashSet;

use axum::async_trait;

use crate::models::{Order, OrderDetail, Pizza, PizzaType, SalesLine};
use crate::reports::aggregator;
use crate::reports::{DailySales, PizzaTypeRevenue, SalesSummary, SizePopularity, TopPizza};

pub use postgres::PgPizzaStore;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, sqlx::Error>;

/// Query/command interface over the pizza-sales tables.
///
/// List methods return rows ordered by primary key. `insert_*` methods write
/// the whole slice in one transaction: either every row lands or none does.
///
/// The report methods default to aggregating `sales_lines` in memory. SQL
/// backends override them with grouped queries so only the report rows leave
/// the database.
#[async_trait]
pub trait PizzaStore: Send + Sync {
    async fn list_pizza_types(&self) -> StoreResult<Vec<PizzaType>>;
    async fn find_pizza_type(&self, id: &str) -> StoreResult<Option<PizzaType>>;

    async fn list_pizzas(&self) -> StoreResult<Vec<Pizza>>;
    async fn find_pizza(&self, id: &str) -> StoreResult<Option<Pizza>>;

    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn find_order(&self, id: i32) -> StoreResult<Option<Order>>;

    async fn list_order_details(&self) -> StoreResult<Vec<OrderDetail>>;
    async fn find_order_detail(&self, id: i32) -> StoreResult<Option<OrderDetail>>;

    async fn pizza_type_ids(&self) -> StoreResult<HashSet<String>>;
    async fn pizza_ids(&self) -> StoreResult<HashSet<String>>;
    async fn order_ids(&self) -> StoreResult<HashSet<i32>>;
    async fn order_detail_ids(&self) -> StoreResult<HashSet<i32>>;

    async fn insert_pizza_types(&self, rows: &[PizzaType]) -> StoreResult<u64>;
    async fn insert_pizzas(&self, rows: &[Pizza]) -> StoreResult<u64>;
    async fn insert_orders(&self, rows: &[Order]) -> StoreResult<u64>;
    async fn insert_order_details(&self, rows: &[OrderDetail]) -> StoreResult<u64>;

    async fn count_orders(&self) -> StoreResult<i64>;

    /// Every order detail joined with its order, pizza and pizza type
    async fn sales_lines(&self) -> StoreResult<Vec<SalesLine>>;

    async fn sales_summary(&self) -> StoreResult<SalesSummary> {
        let total_orders = self.count_orders().await?;
        let lines = self.sales_lines().await?;
        Ok(aggregator::sales_summary(total_orders, &lines))
    }

    async fn daily_sales(&self) -> StoreResult<Vec<DailySales>> {
        let orders = self.list_orders().await?;
        let lines = self.sales_lines().await?;
        Ok(aggregator::daily_sales(&orders, &lines))
    }

    async fn top_pizzas(&self) -> StoreResult<Vec<TopPizza>> {
        Ok(aggregator::top_pizzas(&self.sales_lines().await?))
    }

    async fn pizza_sizes(&self) -> StoreResult<Vec<SizePopularity>> {
        Ok(aggregator::pizza_sizes(&self.sales_lines().await?))
    }

    async fn top_pizza_types_by_revenue(&self) -> StoreResult<Vec<PizzaTypeRevenue>> {
        Ok(aggregator::top_pizza_types_by_revenue(&self.sales_lines().await?))
    }
}
