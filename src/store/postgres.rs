use std::collections::HashSet;

use axum::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{Order, OrderDetail, Pizza, PizzaType, SalesLine};
use crate::reports::aggregator::{
    average_order_value, SUMMARY_TOP_TYPES, TOP_PIZZAS_LIMIT, TOP_TYPES_BY_REVENUE_LIMIT,
};
use crate::reports::{
    DailySales, PizzaTypeQuantity, PizzaTypeRevenue, SalesSummary, SizePopularity, TopPizza,
};
use crate::store::{PizzaStore, StoreResult};

/// PostgreSQL implementation of `PizzaStore`
///
/// Report ties are ordered on the group key with `COLLATE "C"`, the byte order
/// the in-memory aggregation uses.
#[derive(Clone)]
pub struct PgPizzaStore {
    pool: PgPool,
}

impl PgPizzaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a prepared multi-row INSERT inside its own transaction
    async fn execute_batch(&self, mut builder: QueryBuilder<'_, Postgres>) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PizzaStore for PgPizzaStore {
    async fn list_pizza_types(&self) -> StoreResult<Vec<PizzaType>> {
        sqlx::query_as::<_, PizzaType>(
            "SELECT id, name, category, ingredients FROM pizza_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn find_pizza_type(&self, id: &str) -> StoreResult<Option<PizzaType>> {
        sqlx::query_as::<_, PizzaType>(
            "SELECT id, name, category, ingredients FROM pizza_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_pizzas(&self) -> StoreResult<Vec<Pizza>> {
        sqlx::query_as::<_, Pizza>("SELECT id, pizza_type_id, size, price FROM pizzas ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn find_pizza(&self, id: &str) -> StoreResult<Option<Pizza>> {
        sqlx::query_as::<_, Pizza>("SELECT id, pizza_type_id, size, price FROM pizzas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        sqlx::query_as::<_, Order>("SELECT id, order_date FROM orders ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn find_order(&self, id: i32) -> StoreResult<Option<Order>> {
        sqlx::query_as::<_, Order>("SELECT id, order_date FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_order_details(&self) -> StoreResult<Vec<OrderDetail>> {
        sqlx::query_as::<_, OrderDetail>(
            "SELECT id, order_id, pizza_id, quantity FROM order_details ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn find_order_detail(&self, id: i32) -> StoreResult<Option<OrderDetail>> {
        sqlx::query_as::<_, OrderDetail>(
            "SELECT id, order_id, pizza_id, quantity FROM order_details WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn pizza_type_ids(&self) -> StoreResult<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM pizza_types")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn pizza_ids(&self) -> StoreResult<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM pizzas")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn order_ids(&self) -> StoreResult<HashSet<i32>> {
        let ids: Vec<i32> = sqlx::query_scalar("SELECT id FROM orders")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn order_detail_ids(&self) -> StoreResult<HashSet<i32>> {
        let ids: Vec<i32> = sqlx::query_scalar("SELECT id FROM order_details")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn insert_pizza_types(&self, rows: &[PizzaType]) -> StoreResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let mut builder =
            QueryBuilder::new("INSERT INTO pizza_types (id, name, category, ingredients) ");
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.id.clone())
                .push_bind(row.name.clone())
                .push_bind(row.category.clone())
                .push_bind(row.ingredients.clone());
        });
        self.execute_batch(builder).await
    }

    async fn insert_pizzas(&self, rows: &[Pizza]) -> StoreResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::new("INSERT INTO pizzas (id, pizza_type_id, size, price) ");
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.id.clone())
                .push_bind(row.pizza_type_id.clone())
                .push_bind(row.size.clone())
                .push_bind(row.price);
        });
        self.execute_batch(builder).await
    }

    async fn insert_orders(&self, rows: &[Order]) -> StoreResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::new("INSERT INTO orders (id, order_date) ");
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.id).push_bind(row.order_date);
        });
        self.execute_batch(builder).await
    }

    async fn insert_order_details(&self, rows: &[OrderDetail]) -> StoreResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let mut builder =
            QueryBuilder::new("INSERT INTO order_details (id, order_id, pizza_id, quantity) ");
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(row.order_id)
                .push_bind(row.pizza_id.clone())
                .push_bind(row.quantity);
        });
        self.execute_batch(builder).await
    }

    async fn count_orders(&self) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
    }

    async fn sales_lines(&self) -> StoreResult<Vec<SalesLine>> {
        sqlx::query_as::<_, SalesLine>(
            r#"
            SELECT od.order_id,
                   o.order_date,
                   pt.name AS pizza_type_name,
                   p.size,
                   od.quantity,
                   p.price
            FROM order_details od
            JOIN orders o ON o.id = od.order_id
            JOIN pizzas p ON p.id = od.pizza_id
            JOIN pizza_types pt ON pt.id = p.pizza_type_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn sales_summary(&self) -> StoreResult<SalesSummary> {
        let total_orders = self.count_orders().await?;

        let (total_pizzas_sold, total_sales): (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(od.quantity), 0)::BIGINT,
                   COALESCE(SUM(od.quantity * p.price), 0)
            FROM order_details od
            JOIN orders o ON o.id = od.order_id
            JOIN pizzas p ON p.id = od.pizza_id
            JOIN pizza_types pt ON pt.id = p.pizza_type_id
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let top_pizza_types = sqlx::query_as::<_, PizzaTypeQuantity>(
            r#"
            SELECT pt.name AS pizza_type,
                   SUM(od.quantity)::BIGINT AS quantity_sold
            FROM order_details od
            JOIN orders o ON o.id = od.order_id
            JOIN pizzas p ON p.id = od.pizza_id
            JOIN pizza_types pt ON pt.id = p.pizza_type_id
            GROUP BY pt.name
            ORDER BY quantity_sold DESC, pt.name COLLATE "C"
            LIMIT $1
            "#,
        )
        .bind(SUMMARY_TOP_TYPES as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(SalesSummary {
            total_orders,
            total_pizzas_sold,
            total_sales,
            average_order_value: average_order_value(total_sales, total_orders),
            top_pizza_types,
        })
    }

    async fn daily_sales(&self) -> StoreResult<Vec<DailySales>> {
        sqlx::query_as::<_, DailySales>(
            r#"
            SELECT per_order.day AS "date",
                   COUNT(*)::BIGINT AS total_orders,
                   COALESCE(SUM(per_order.pizzas), 0)::BIGINT AS total_pizzas_sold,
                   COALESCE(SUM(per_order.sales), 0) AS total_sales
            FROM (
                SELECT (o.order_date AT TIME ZONE 'UTC')::DATE AS day,
                       SUM(od.quantity) AS pizzas,
                       SUM(od.quantity * p.price) AS sales
                FROM orders o
                LEFT JOIN order_details od ON od.order_id = o.id
                LEFT JOIN pizzas p ON p.id = od.pizza_id
                GROUP BY o.id
            ) per_order
            GROUP BY per_order.day
            ORDER BY per_order.day DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn top_pizzas(&self) -> StoreResult<Vec<TopPizza>> {
        sqlx::query_as::<_, TopPizza>(
            r#"
            SELECT pt.name AS pizza_name,
                   SUM(od.quantity)::BIGINT AS quantity_sold,
                   SUM(od.quantity * p.price) AS total_sales
            FROM order_details od
            JOIN orders o ON o.id = od.order_id
            JOIN pizzas p ON p.id = od.pizza_id
            JOIN pizza_types pt ON pt.id = p.pizza_type_id
            GROUP BY pt.name
            ORDER BY quantity_sold DESC, pt.name COLLATE "C"
            LIMIT $1
            "#,
        )
        .bind(TOP_PIZZAS_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
    }

    async fn pizza_sizes(&self) -> StoreResult<Vec<SizePopularity>> {
        sqlx::query_as::<_, SizePopularity>(
            r#"
            SELECT p.size,
                   SUM(od.quantity)::BIGINT AS quantity_sold,
                   SUM(od.quantity * p.price) AS total_sales
            FROM order_details od
            JOIN orders o ON o.id = od.order_id
            JOIN pizzas p ON p.id = od.pizza_id
            JOIN pizza_types pt ON pt.id = p.pizza_type_id
            GROUP BY p.size
            ORDER BY quantity_sold DESC, p.size COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn top_pizza_types_by_revenue(&self) -> StoreResult<Vec<PizzaTypeRevenue>> {
        sqlx::query_as::<_, PizzaTypeRevenue>(
            r#"
            SELECT pt.name AS pizza_type,
                   SUM(od.quantity)::BIGINT AS quantity_sold,
                   SUM(od.quantity * p.price) AS total_revenue
            FROM order_details od
            JOIN orders o ON o.id = od.order_id
            JOIN pizzas p ON p.id = od.pizza_id
            JOIN pizza_types pt ON pt.id = p.pizza_type_id
            GROUP BY pt.name
            ORDER BY total_revenue DESC, pt.name COLLATE "C"
            LIMIT $1
            "#,
        )
        .bind(TOP_TYPES_BY_REVENUE_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
    }
}
