use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::domain::errors::StoreError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;

/// Process-local store with the same contract as the Postgres one: whole
/// aggregates, unique `order_uid`, no overwrite on duplicates.
///
/// It can be switched offline to mimic a store outage.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<String, Order>>,
    offline: AtomicBool,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, order_uid: &str) -> bool {
        self.orders.read().contains_key(order_uid)
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn persist(&self, order: &Order) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut orders = self.orders.write();
        if orders.contains_key(&order.order_uid) {
            return Err(StoreError::Conflict(format!(
                "order {} already exists",
                order.order_uid
            )));
        }
        orders.insert(order.order_uid.clone(), order.clone());
        Ok(())
    }

    fn fetch(&self, order_uid: &str) -> Result<Order, StoreError> {
        self.ensure_online()?;
        self.orders
            .read()
            .get(order_uid)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn recent(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        self.ensure_online()?;
        let mut all: Vec<Order> = self.orders.read().values().cloned().collect();
        all.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| b.order_uid.cmp(&a.order_uid))
        });
        all.truncate(limit);
        all.reverse();
        Ok(all)
    }
}
