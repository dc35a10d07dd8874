// In-memory `PizzaStore` used by the test suites.
//
// Mirrors the constraints the PostgreSQL schema enforces (unique primary keys,
// foreign keys from pizzas and order details) so batch failures behave the
// same way: a rejected batch leaves the tables untouched.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use axum::async_trait;

use crate::models::{Order, OrderDetail, Pizza, PizzaType, SalesLine};
use crate::store::{PizzaStore, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    pizza_types: BTreeMap<String, PizzaType>,
    pizzas: BTreeMap<String, Pizza>,
    orders: BTreeMap<i32, Order>,
    order_details: BTreeMap<i32, OrderDetail>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    list_queries: AtomicUsize,
    insert_calls: AtomicUsize,
    fail_inserts: AtomicBool,
    failing_inserts: AtomicUsize,
    fail_reads: AtomicBool,
}

fn rejected(message: impl Into<String>) -> sqlx::Error {
    sqlx::Error::Protocol(message.into())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `list_*` calls that reached the store
    pub fn list_queries(&self) -> usize {
        self.list_queries.load(Ordering::SeqCst)
    }

    /// Number of `insert_*` calls, successful or not
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent insert fail as if the database rejected it
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make only the next `count` inserts fail
    pub fn fail_next_inserts(&self, count: usize) {
        self.failing_inserts.store(count, Ordering::SeqCst);
    }

    /// Make every subsequent read fail as if the connection dropped
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn seed_pizza_type(&self, id: &str, name: &str, category: &str) {
        let mut tables = self.tables.lock().unwrap();
        tables.pizza_types.insert(
            id.to_string(),
            PizzaType {
                id: id.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                ingredients: String::new(),
            },
        );
    }

    pub fn seed_pizza(&self, pizza: Pizza) {
        self.tables.lock().unwrap().pizzas.insert(pizza.id.clone(), pizza);
    }

    pub fn seed_order(&self, order: Order) {
        self.tables.lock().unwrap().orders.insert(order.id, order);
    }

    pub fn seed_order_detail(&self, detail: OrderDetail) {
        self.tables.lock().unwrap().order_details.insert(detail.id, detail);
    }

    fn read_guard(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(rejected("connection refused"));
        }
        Ok(())
    }

    fn list_guard(&self) -> StoreResult<()> {
        self.read_guard()?;
        self.list_queries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn insert_guard(&self) -> StoreResult<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let one_off = self
            .failing_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if one_off || self.fail_inserts.load(Ordering::SeqCst) {
            return Err(rejected("insert rejected"));
        }
        Ok(())
    }
}

/// Reject the batch if any key already exists or repeats inside the batch
fn check_unique<K: Ord + Clone + std::fmt::Debug, V>(
    table: &BTreeMap<K, V>,
    keys: impl Iterator<Item = K>,
) -> StoreResult<()> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if table.contains_key(&key) || !seen.insert(key.clone()) {
            return Err(rejected(format!("duplicate key value: {:?}", key)));
        }
    }
    Ok(())
}

#[async_trait]
impl PizzaStore for InMemoryStore {
    async fn list_pizza_types(&self) -> StoreResult<Vec<PizzaType>> {
        self.list_guard()?;
        Ok(self.tables.lock().unwrap().pizza_types.values().cloned().collect())
    }

    async fn find_pizza_type(&self, id: &str) -> StoreResult<Option<PizzaType>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().pizza_types.get(id).cloned())
    }

    async fn list_pizzas(&self) -> StoreResult<Vec<Pizza>> {
        self.list_guard()?;
        Ok(self.tables.lock().unwrap().pizzas.values().cloned().collect())
    }

    async fn find_pizza(&self, id: &str) -> StoreResult<Option<Pizza>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().pizzas.get(id).cloned())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.list_guard()?;
        Ok(self.tables.lock().unwrap().orders.values().cloned().collect())
    }

    async fn find_order(&self, id: i32) -> StoreResult<Option<Order>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().orders.get(&id).cloned())
    }

    async fn list_order_details(&self) -> StoreResult<Vec<OrderDetail>> {
        self.list_guard()?;
        Ok(self.tables.lock().unwrap().order_details.values().cloned().collect())
    }

    async fn find_order_detail(&self, id: i32) -> StoreResult<Option<OrderDetail>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().order_details.get(&id).cloned())
    }

    async fn pizza_type_ids(&self) -> StoreResult<HashSet<String>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().pizza_types.keys().cloned().collect())
    }

    async fn pizza_ids(&self) -> StoreResult<HashSet<String>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().pizzas.keys().cloned().collect())
    }

    async fn order_ids(&self) -> StoreResult<HashSet<i32>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().orders.keys().copied().collect())
    }

    async fn order_detail_ids(&self) -> StoreResult<HashSet<i32>> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().order_details.keys().copied().collect())
    }

    async fn insert_pizza_types(&self, rows: &[PizzaType]) -> StoreResult<u64> {
        self.insert_guard()?;
        let mut tables = self.tables.lock().unwrap();
        check_unique(&tables.pizza_types, rows.iter().map(|r| r.id.clone()))?;
        for row in rows {
            tables.pizza_types.insert(row.id.clone(), row.clone());
        }
        Ok(rows.len() as u64)
    }

    async fn insert_pizzas(&self, rows: &[Pizza]) -> StoreResult<u64> {
        self.insert_guard()?;
        let mut tables = self.tables.lock().unwrap();
        check_unique(&tables.pizzas, rows.iter().map(|r| r.id.clone()))?;
        if let Some(orphan) = rows
            .iter()
            .find(|r| !tables.pizza_types.contains_key(&r.pizza_type_id))
        {
            return Err(rejected(format!(
                "foreign key violation: pizza type {}",
                orphan.pizza_type_id
            )));
        }
        for row in rows {
            tables.pizzas.insert(row.id.clone(), row.clone());
        }
        Ok(rows.len() as u64)
    }

    async fn insert_orders(&self, rows: &[Order]) -> StoreResult<u64> {
        self.insert_guard()?;
        let mut tables = self.tables.lock().unwrap();
        check_unique(&tables.orders, rows.iter().map(|r| r.id))?;
        for row in rows {
            tables.orders.insert(row.id, row.clone());
        }
        Ok(rows.len() as u64)
    }

    async fn insert_order_details(&self, rows: &[OrderDetail]) -> StoreResult<u64> {
        self.insert_guard()?;
        let mut tables = self.tables.lock().unwrap();
        check_unique(&tables.order_details, rows.iter().map(|r| r.id))?;
        if let Some(orphan) = rows.iter().find(|r| {
            !tables.orders.contains_key(&r.order_id) || !tables.pizzas.contains_key(&r.pizza_id)
        }) {
            return Err(rejected(format!(
                "foreign key violation: order detail {}",
                orphan.id
            )));
        }
        for row in rows {
            tables.order_details.insert(row.id, row.clone());
        }
        Ok(rows.len() as u64)
    }

    async fn count_orders(&self) -> StoreResult<i64> {
        self.read_guard()?;
        Ok(self.tables.lock().unwrap().orders.len() as i64)
    }

    async fn sales_lines(&self) -> StoreResult<Vec<SalesLine>> {
        self.read_guard()?;
        let tables = self.tables.lock().unwrap();
        let lines = tables
            .order_details
            .values()
            .filter_map(|detail| {
                let order = tables.orders.get(&detail.order_id)?;
                let pizza = tables.pizzas.get(&detail.pizza_id)?;
                let pizza_type = tables.pizza_types.get(&pizza.pizza_type_id)?;
                Some(SalesLine {
                    order_id: order.id,
                    order_date: order.order_date,
                    pizza_type_name: pizza_type.name.clone(),
                    size: pizza.size.clone(),
                    quantity: detail.quantity,
                    price: pizza.price,
                })
            })
            .collect();
        Ok(lines)
    }
}
