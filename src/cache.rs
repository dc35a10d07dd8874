// Read-through snapshot cache
//
// Each cached query owns one `Snapshot` slot under a fixed key. A slot holds
// the materialized result and the instant it was written; it is served until
// the TTL elapses, then the next reader reloads it from the store. Writes to
// the store never invalidate a slot.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::{Order, OrderDetail, Pizza, PizzaType};
use crate::reports::SalesSummary;

/// Default absolute expiry for every cached read (5 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

pub const ORDERS_KEY: &str = "TopOrders";
pub const ORDER_DETAILS_KEY: &str = "TopOrderDetails";
pub const PIZZA_TYPES_KEY: &str = "TopPizzaTypes";
pub const PIZZAS_KEY: &str = "TopPizzas";
pub const SALES_SUMMARY_KEY: &str = "SalesSummary";

struct Entry<T> {
    value: Arc<T>,
    written_at: Instant,
}

impl<T> Entry<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.written_at.elapsed() < ttl
    }
}

/// A single cached value with absolute expiry
pub struct Snapshot<T> {
    key: &'static str,
    ttl: Duration,
    slot: RwLock<Option<Entry<T>>>,
}

impl<T> Snapshot<T> {
    pub fn new(key: &'static str, ttl: Duration) -> Self {
        Self {
            key,
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Return the cached value, or load, store and return a fresh one.
    ///
    /// Concurrent misses are serialized on the write lock and re-check
    /// freshness, so only the first of them reaches the loader. A failed load
    /// leaves the slot as it was.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        {
            let slot = self.slot.read().await;
            if let Some(entry) = slot.as_ref().filter(|e| e.is_fresh(self.ttl)) {
                tracing::debug!("Cache hit for {}", self.key);
                return Ok(entry.value.clone());
            }
        }

        let mut slot = self.slot.write().await;
        if let Some(entry) = slot.as_ref().filter(|e| e.is_fresh(self.ttl)) {
            return Ok(entry.value.clone());
        }

        tracing::debug!("Cache miss for {}, loading from store", self.key);
        let value = Arc::new(load().await?);
        *slot = Some(Entry {
            value: value.clone(),
            written_at: Instant::now(),
        });
        Ok(value)
    }
}

/// Every cached query the API serves
pub struct ReadCache {
    pub orders: Snapshot<Vec<Order>>,
    pub order_details: Snapshot<Vec<OrderDetail>>,
    pub pizza_types: Snapshot<Vec<PizzaType>>,
    pub pizzas: Snapshot<Vec<Pizza>>,
    pub sales_summary: Snapshot<SalesSummary>,
}

impl ReadCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            orders: Snapshot::new(ORDERS_KEY, ttl),
            order_details: Snapshot::new(ORDER_DETAILS_KEY, ttl),
            pizza_types: Snapshot::new(PIZZA_TYPES_KEY, ttl),
            pizzas: Snapshot::new(PIZZAS_KEY, ttl),
            sales_summary: Snapshot::new(SALES_SUMMARY_KEY, ttl),
        }
    }
}

impl Default for ReadCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn counting_load(calls: &AtomicUsize) -> Result<Vec<i32>, String> {
        let n = calls.fetch_add(1, Ordering::SeqCst) as i32;
        Ok(vec![n, n + 1])
    }

    #[tokio::test]
    async fn test_snapshot_serves_cached_value_within_ttl() {
        let snapshot = Snapshot::new("Test", Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let first = snapshot.get_or_load(|| counting_load(&calls)).await.unwrap();
        let second = snapshot.get_or_load(|| counting_load(&calls)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_snapshot_reloads_after_expiry() {
        let snapshot = Snapshot::new("Test", Duration::from_millis(20));
        let calls = AtomicUsize::new(0);

        let first = snapshot.get_or_load(|| counting_load(&calls)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        let second = snapshot.get_or_load(|| counting_load(&calls)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_snapshot_zero_ttl_always_reloads() {
        let snapshot = Snapshot::new("Test", Duration::ZERO);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            snapshot.get_or_load(|| counting_load(&calls)).await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_snapshot_failed_load_is_not_cached() {
        let snapshot: Snapshot<Vec<i32>> = Snapshot::new("Test", Duration::from_secs(60));

        let failed = snapshot
            .get_or_load(|| async { Err::<Vec<i32>, _>("store down".to_string()) })
            .await;
        assert!(failed.is_err());

        let calls = AtomicUsize::new(0);
        snapshot.get_or_load(|| counting_load(&calls)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_load_once() {
        let snapshot = Arc::new(Snapshot::new("Test", Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let snapshot = snapshot.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                snapshot
                    .get_or_load(|| async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        Ok::<_, String>(vec![1, 2, 3])
                    })
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(*handle.await.unwrap(), vec![1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_read_cache_keys() {
        let cache = ReadCache::default();
        assert_eq!(cache.orders.key(), "TopOrders");
        assert_eq!(cache.order_details.key(), "TopOrderDetails");
        assert_eq!(cache.pizza_types.key(), "TopPizzaTypes");
        assert_eq!(cache.pizzas.key(), "TopPizzas");
        assert_eq!(cache.sales_summary.key(), "SalesSummary");
    }
}
