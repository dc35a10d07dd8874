use std::sync::Arc;

use crate::cache::ReadCache;
use crate::models::{Order, OrderDetail, Pizza, PizzaType};
use crate::store::{PizzaStore, StoreResult};

/// Read access to the four pizza-sales tables
///
/// List reads go through the read cache: the full listing is cached and the
/// limit is applied to the cached copy. Single-row lookups always hit the
/// store.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn PizzaStore>,
    cache: Arc<ReadCache>,
}

/// First `limit` rows of a cached listing, or all of them
fn take_rows<T: Clone>(rows: &[T], limit: Option<usize>) -> Vec<T> {
    match limit {
        Some(limit) => rows.iter().take(limit).cloned().collect(),
        None => rows.to_vec(),
    }
}

impl CatalogService {
    pub fn new(store: Arc<dyn PizzaStore>, cache: Arc<ReadCache>) -> Self {
        Self { store, cache }
    }

    pub async fn list_orders(&self, limit: Option<usize>) -> StoreResult<Vec<Order>> {
        let store = self.store.clone();
        let rows = self
            .cache
            .orders
            .get_or_load(move || async move { store.list_orders().await })
            .await?;
        Ok(take_rows(&rows, limit))
    }

    pub async fn get_order(&self, id: i32) -> StoreResult<Option<Order>> {
        self.store.find_order(id).await
    }

    pub async fn list_order_details(&self, limit: Option<usize>) -> StoreResult<Vec<OrderDetail>> {
        let store = self.store.clone();
        let rows = self
            .cache
            .order_details
            .get_or_load(move || async move { store.list_order_details().await })
            .await?;
        Ok(take_rows(&rows, limit))
    }

    pub async fn get_order_detail(&self, id: i32) -> StoreResult<Option<OrderDetail>> {
        self.store.find_order_detail(id).await
    }

    pub async fn list_pizza_types(&self, limit: Option<usize>) -> StoreResult<Vec<PizzaType>> {
        let store = self.store.clone();
        let rows = self
            .cache
            .pizza_types
            .get_or_load(move || async move { store.list_pizza_types().await })
            .await?;
        Ok(take_rows(&rows, limit))
    }

    pub async fn get_pizza_type(&self, id: &str) -> StoreResult<Option<PizzaType>> {
        self.store.find_pizza_type(id).await
    }

    pub async fn list_pizzas(&self, limit: Option<usize>) -> StoreResult<Vec<Pizza>> {
        let store = self.store.clone();
        let rows = self
            .cache
            .pizzas
            .get_or_load(move || async move { store.list_pizzas().await })
            .await?;
        Ok(take_rows(&rows, limit))
    }

    pub async fn get_pizza(&self, id: &str) -> StoreResult<Option<Pizza>> {
        self.store.find_pizza(id).await
    }
}
