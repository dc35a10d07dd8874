// Column contracts and row mapping for the four importable tables

use std::collections::HashSet;
use std::str::FromStr;

use axum::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::import::engine::{ImportTarget, SkipReason};
use crate::import::rows::RawRow;
use crate::import::ImportKind;
use crate::models::{Order, OrderDetail, Pizza, PizzaType};
use crate::store::{PizzaStore, StoreResult};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Upper bound for a unit price; keeps quantity × price well inside the
/// decimal range
const MAX_PRICE: i64 = 1_000_000;

fn parse_field<T: FromStr>(row: &RawRow, index: usize, column: &str) -> Result<T, String> {
    let value = row.field(index);
    value
        .parse()
        .map_err(|_| format!("invalid {} '{}'", column, value))
}

fn required(row: &RawRow, index: usize, column: &str) -> Result<String, String> {
    let value = row.field(index);
    if value.is_empty() {
        return Err(format!("{} is required", column));
    }
    Ok(value.to_string())
}

fn parse_price(row: &RawRow, index: usize) -> Result<Decimal, String> {
    let price: Decimal = parse_field(row, index, "price")?;
    if price.is_sign_negative() || price > Decimal::from(MAX_PRICE) {
        return Err(format!("price '{}' out of range", row.field(index)));
    }
    Ok(price)
}

/// Combine a calendar date and a time of day into a UTC timestamp
pub fn parse_order_date(date: &str, time: &str) -> Result<DateTime<Utc>, String> {
    let day = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(date, f).ok())
        .ok_or_else(|| format!("invalid date '{}'", date))?;
    let time_of_day = TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(time, f).ok())
        .ok_or_else(|| format!("invalid time '{}'", time))?;

    Ok(Utc.from_utc_datetime(&day.and_time(time_of_day)))
}

pub struct PizzaTypeImport;

#[async_trait]
impl ImportTarget for PizzaTypeImport {
    type Record = PizzaType;
    type Key = String;
    type References = ();

    const KIND: ImportKind = ImportKind::PizzaTypes;
    const COLUMNS: &'static [&'static str] = &["pizza_type_id", "name", "category", "ingredients"];

    fn parse(&self, row: &RawRow) -> Result<PizzaType, String> {
        Ok(PizzaType {
            id: required(row, 0, "pizza_type_id")?,
            name: required(row, 1, "name")?,
            category: row.field(2).to_string(),
            ingredients: row.field(3).to_string(),
        })
    }

    fn key(&self, record: &PizzaType) -> String {
        record.id.clone()
    }

    async fn existing_keys(&self, store: &dyn PizzaStore) -> StoreResult<HashSet<String>> {
        store.pizza_type_ids().await
    }

    async fn load_references(&self, _store: &dyn PizzaStore) -> StoreResult<()> {
        Ok(())
    }

    fn check_references(&self, _: &(), _: &PizzaType) -> Option<(SkipReason, String)> {
        None
    }

    async fn write_batch(&self, store: &dyn PizzaStore, batch: &[PizzaType]) -> StoreResult<u64> {
        store.insert_pizza_types(batch).await
    }
}

pub struct PizzaImport;

#[async_trait]
impl ImportTarget for PizzaImport {
    type Record = Pizza;
    type Key = String;
    /// Known pizza type ids
    type References = HashSet<String>;

    const KIND: ImportKind = ImportKind::Pizzas;
    const COLUMNS: &'static [&'static str] = &["pizza_id", "pizza_type_id", "size", "price"];

    fn parse(&self, row: &RawRow) -> Result<Pizza, String> {
        Ok(Pizza {
            id: required(row, 0, "pizza_id")?,
            pizza_type_id: required(row, 1, "pizza_type_id")?,
            size: row.field(2).to_string(),
            price: parse_price(row, 3)?,
        })
    }

    fn key(&self, record: &Pizza) -> String {
        record.id.clone()
    }

    async fn existing_keys(&self, store: &dyn PizzaStore) -> StoreResult<HashSet<String>> {
        store.pizza_ids().await
    }

    async fn load_references(&self, store: &dyn PizzaStore) -> StoreResult<HashSet<String>> {
        store.pizza_type_ids().await
    }

    fn check_references(
        &self,
        pizza_types: &HashSet<String>,
        record: &Pizza,
    ) -> Option<(SkipReason, String)> {
        if pizza_types.contains(&record.pizza_type_id) {
            return None;
        }
        Some((
            SkipReason::MissingPizzaType,
            format!("pizza type '{}' does not exist", record.pizza_type_id),
        ))
    }

    async fn write_batch(&self, store: &dyn PizzaStore, batch: &[Pizza]) -> StoreResult<u64> {
        store.insert_pizzas(batch).await
    }
}

pub struct OrderImport;

#[async_trait]
impl ImportTarget for OrderImport {
    type Record = Order;
    type Key = i32;
    type References = ();

    const KIND: ImportKind = ImportKind::Orders;
    const COLUMNS: &'static [&'static str] = &["order_id", "date", "time"];

    fn parse(&self, row: &RawRow) -> Result<Order, String> {
        Ok(Order {
            id: parse_field(row, 0, "order_id")?,
            order_date: parse_order_date(row.field(1), row.field(2))?,
        })
    }

    fn key(&self, record: &Order) -> i32 {
        record.id
    }

    async fn existing_keys(&self, store: &dyn PizzaStore) -> StoreResult<HashSet<i32>> {
        store.order_ids().await
    }

    async fn load_references(&self, _store: &dyn PizzaStore) -> StoreResult<()> {
        Ok(())
    }

    fn check_references(&self, _: &(), _: &Order) -> Option<(SkipReason, String)> {
        None
    }

    async fn write_batch(&self, store: &dyn PizzaStore, batch: &[Order]) -> StoreResult<u64> {
        store.insert_orders(batch).await
    }
}

/// Order and pizza ids an order detail may point at
pub struct OrderDetailReferences {
    pub orders: HashSet<i32>,
    pub pizzas: HashSet<String>,
}

pub struct OrderDetailImport;

#[async_trait]
impl ImportTarget for OrderDetailImport {
    type Record = OrderDetail;
    type Key = i32;
    type References = OrderDetailReferences;

    const KIND: ImportKind = ImportKind::OrderDetails;
    const COLUMNS: &'static [&'static str] = &["order_details_id", "order_id", "pizza_id", "quantity"];

    fn parse(&self, row: &RawRow) -> Result<OrderDetail, String> {
        Ok(OrderDetail {
            id: parse_field(row, 0, "order_details_id")?,
            order_id: parse_field(row, 1, "order_id")?,
            pizza_id: required(row, 2, "pizza_id")?,
            quantity: parse_field(row, 3, "quantity")?,
        })
    }

    fn key(&self, record: &OrderDetail) -> i32 {
        record.id
    }

    async fn existing_keys(&self, store: &dyn PizzaStore) -> StoreResult<HashSet<i32>> {
        store.order_detail_ids().await
    }

    async fn load_references(&self, store: &dyn PizzaStore) -> StoreResult<OrderDetailReferences> {
        Ok(OrderDetailReferences {
            orders: store.order_ids().await?,
            pizzas: store.pizza_ids().await?,
        })
    }

    fn check_references(
        &self,
        references: &OrderDetailReferences,
        record: &OrderDetail,
    ) -> Option<(SkipReason, String)> {
        if !references.orders.contains(&record.order_id) {
            return Some((
                SkipReason::MissingOrder,
                format!("order {} does not exist", record.order_id),
            ));
        }
        if !references.pizzas.contains(&record.pizza_id) {
            return Some((
                SkipReason::MissingPizza,
                format!("pizza '{}' does not exist", record.pizza_id),
            ));
        }
        None
    }

    async fn write_batch(&self, store: &dyn PizzaStore, batch: &[OrderDetail]) -> StoreResult<u64> {
        store.insert_order_details(batch).await
    }
}
