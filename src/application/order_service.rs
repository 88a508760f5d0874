use std::sync::Arc;

use crate::cache::OrderCache;
use crate::domain::errors::StoreError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;

/// Where a lookup was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Store,
}

/// Read-through lookups: cache first, then the store, backfilling the cache
/// on a store hit.
pub struct OrderService<R> {
    repo: Arc<R>,
    cache: Arc<OrderCache>,
}

impl<R> Clone for OrderService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: Arc<R>, cache: Arc<OrderCache>) -> Self {
        Self { repo, cache }
    }

    pub fn get_order(&self, order_uid: &str) -> Result<Arc<Order>, StoreError> {
        self.lookup(order_uid).map(|(order, _)| order)
    }

    /// Like [`get_order`](Self::get_order) but also reports which tier
    /// answered.
    pub fn lookup(&self, order_uid: &str) -> Result<(Arc<Order>, Source), StoreError> {
        let key = order_uid.to_string();
        if let Some(order) = self.cache.get(&key) {
            log::debug!("Order {} served from cache", order_uid);
            return Ok((order, Source::Cache));
        }

        let order = Arc::new(self.repo.fetch(order_uid)?);
        log::debug!("Order {} served from store", order_uid);
        self.cache.add(key, Arc::clone(&order));
        Ok((order, Source::Store))
    }

    /// Fills the cache with the store's most recent orders.
    pub fn warm(&self, limit: usize) -> Result<usize, StoreError> {
        if limit == 0 {
            return Ok(0);
        }
        let orders = self.repo.recent(limit)?;
        let loaded = orders.len();
        self.cache.load_orders(orders);
        Ok(loaded)
    }
}
