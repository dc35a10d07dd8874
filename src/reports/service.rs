use std::sync::Arc;

use crate::cache::ReadCache;
use crate::reports::{DailySales, PizzaTypeRevenue, SalesSummary, SizePopularity, TopPizza};
use crate::store::{PizzaStore, StoreResult};

/// Service for the sales reports
///
/// Reports are aggregated by the store. Only the sales summary goes through
/// the read cache; the other reports are queried on each call.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn PizzaStore>,
    cache: Arc<ReadCache>,
}

impl ReportService {
    pub fn new(store: Arc<dyn PizzaStore>, cache: Arc<ReadCache>) -> Self {
        Self { store, cache }
    }

    pub async fn sales_summary(&self) -> StoreResult<Arc<SalesSummary>> {
        let store = self.store.clone();
        self.cache
            .sales_summary
            .get_or_load(move || async move {
                tracing::debug!("Computing sales summary");
                store.sales_summary().await
            })
            .await
    }

    pub async fn daily_sales(&self) -> StoreResult<Vec<DailySales>> {
        self.store.daily_sales().await
    }

    pub async fn top_pizzas(&self) -> StoreResult<Vec<TopPizza>> {
        self.store.top_pizzas().await
    }

    pub async fn pizza_sizes(&self) -> StoreResult<Vec<SizePopularity>> {
        self.store.pizza_sizes().await
    }

    pub async fn top_pizza_types(&self) -> StoreResult<Vec<PizzaTypeRevenue>> {
        self.store.top_pizza_types_by_revenue().await
    }
}
