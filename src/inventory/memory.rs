// In-memory store - the default backend and the test double

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::error::StoreError;
use super::traits::{InventoryStore, OrderStore};
use super::types::{
    Equipment, EquipmentId, EquipmentTransaction, OrderId, Stock, StockId,
};
use crate::orders::types::{Order, ProductRequirement};

/// Stores everything behind a single mutex, which gives the order aggregator
/// the snapshot-consistent reads it expects and makes the two-write commit
/// trivially atomic. Clone shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    equipment: HashMap<EquipmentId, Equipment>,
    stocks: HashMap<StockId, Stock>,
    transactions: Vec<EquipmentTransaction>,
    orders: HashMap<OrderId, Order>,
    order_equipment: HashMap<OrderId, Vec<EquipmentId>>,
    requirements: HashMap<OrderId, Vec<ProductRequirement>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::backend("memory store mutex poisoned"))
    }

    /// Guard for the infallible seeding/inspection helpers. A poisoned mutex
    /// panics here; the store trait methods go through `lock` and surface it
    /// as `StoreError::Backend` instead.
    fn seed(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }

    pub fn add_equipment(&self, equipment: Equipment) {
        self.seed().equipment.insert(equipment.id, equipment);
    }

    pub fn add_stock(&self, stock: Stock) {
        self.seed().stocks.insert(stock.id, stock);
    }

    pub fn add_order(&self, order: Order) {
        self.seed().orders.insert(order.id, order);
    }

    pub fn link_equipment(&self, order: OrderId, equipment: EquipmentId) {
        self.seed()
            .order_equipment
            .entry(order)
            .or_default()
            .push(equipment);
    }

    pub fn add_requirement(&self, order: OrderId, requirement: ProductRequirement) {
        self.seed()
            .requirements
            .entry(order)
            .or_default()
            .push(requirement);
    }

    /// Total number of ledger entries across all equipment.
    pub fn transaction_count(&self) -> usize {
        self.seed().transactions.len()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn equipment(&self, id: EquipmentId) -> Result<Equipment, StoreError> {
        self.lock()?
            .equipment
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("equipment", id))
    }

    async fn stock(&self, id: StockId) -> Result<Stock, StoreError> {
        self.lock()?
            .stocks
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("stock", id))
    }

    async fn commit_action(
        &self,
        equipment: &Equipment,
        expected_version: u64,
        transaction: &EquipmentTransaction,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let current = inner
            .equipment
            .get(&equipment.id)
            .ok_or_else(|| StoreError::not_found("equipment", equipment.id))?;
        if current.version != expected_version {
            return Err(StoreError::Conflict {
                id: equipment.id,
                expected: expected_version,
            });
        }
        inner.equipment.insert(equipment.id, equipment.clone());
        inner.transactions.push(transaction.clone());
        Ok(())
    }

    async fn transactions(
        &self,
        equipment: EquipmentId,
    ) -> Result<Vec<EquipmentTransaction>, StoreError> {
        Ok(self
            .lock()?
            .transactions
            .iter()
            .filter(|t| t.equipment == equipment)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn order(&self, id: OrderId) -> Result<Order, StoreError> {
        self.lock()?
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    async fn order_equipment(&self, id: OrderId) -> Result<Vec<EquipmentId>, StoreError> {
        Ok(self.lock()?.order_equipment.get(&id).cloned().unwrap_or_default())
    }

    async fn requested_products(
        &self,
        id: OrderId,
    ) -> Result<Vec<ProductRequirement>, StoreError> {
        Ok(self.lock()?.requirements.get(&id).cloned().unwrap_or_default())
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        self.lock()?.orders.insert(order.id, order.clone());
        Ok(())
    }
}
