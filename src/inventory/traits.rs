// Seams for dependency injection - storage and authorization

use async_trait::async_trait;

use super::error::StoreError;
use super::types::{
    ActionKind, Equipment, EquipmentId, EquipmentTransaction, OrderId, Stock, StockId, User,
};
use crate::orders::types::{Order, ProductRequirement};

/// Durable storage for equipment and the transaction ledger.
///
/// `commit_action` is the engine's atomic unit of work: the equipment
/// mutation and the ledger entry must land together or not at all, and the
/// write must fail with `StoreError::Conflict` when `expected_version` no
/// longer matches the stored record.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn equipment(&self, id: EquipmentId) -> Result<Equipment, StoreError>;

    async fn stock(&self, id: StockId) -> Result<Stock, StoreError>;

    async fn commit_action(
        &self,
        equipment: &Equipment,
        expected_version: u64,
        transaction: &EquipmentTransaction,
    ) -> Result<(), StoreError>;

    /// The ledger for one equipment unit, oldest first.
    async fn transactions(
        &self,
        equipment: EquipmentId,
    ) -> Result<Vec<EquipmentTransaction>, StoreError>;
}

/// Durable storage for orders and their equipment/product links.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn order(&self, id: OrderId) -> Result<Order, StoreError>;

    async fn order_equipment(&self, id: OrderId) -> Result<Vec<EquipmentId>, StoreError>;

    async fn requested_products(&self, id: OrderId)
        -> Result<Vec<ProductRequirement>, StoreError>;

    async fn save_order(&self, order: &Order) -> Result<(), StoreError>;
}

/// Decides whether a user may run an action against a piece of equipment.
///
/// Injected into the engine so deployments can wire their own policy. The
/// crate ships `AllowAll` only; there is deliberately no built-in rule set.
#[cfg_attr(test, mockall::automock)]
pub trait AuthorizationPolicy: Send + Sync {
    fn is_authorized(&self, user: &User, equipment: &Equipment, kind: ActionKind) -> bool;
}

/// Default-allow policy. Suitable for trusted in-process callers and tests;
/// anything else should inject a real policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AuthorizationPolicy for AllowAll {
    fn is_authorized(&self, _user: &User, _equipment: &Equipment, _kind: ActionKind) -> bool {
        true
    }
}
