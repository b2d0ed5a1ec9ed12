// Order aggregator - decides completion eligibility from the ledger

use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, warn};

use super::types::{Order, OrderActivity, OrderStatus};
use crate::inventory::error::StoreError;
use crate::inventory::traits::{InventoryStore, OrderStore};
use crate::inventory::types::{ActionKind, EquipmentId, GenericProductId, OrderId};

/// Failures of an order completion or cancellation attempt. `Incomplete` is
/// recoverable: the caller may re-run with `ignore_issues`.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(
        "order {order} cannot be completed: {count} equipment without a {expected} transaction",
        count = .equipment.len()
    )]
    Incomplete {
        order: OrderId,
        expected: ActionKind,
        /// The offending units, so the caller can name them.
        equipment: Vec<EquipmentId>,
    },

    #[error("order {order}: equipment {equipment} is not part of the requested products")]
    UnrequestedEquipment {
        order: OrderId,
        equipment: EquipmentId,
    },

    #[error("order {order}: requested product quantities do not match the linked equipment")]
    QuantityMismatch { order: OrderId },

    #[error("order {order} is {status} and can no longer change", status = .status.as_str())]
    Closed { order: OrderId, status: OrderStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Aggregates per-equipment transaction outcomes into an overall order
/// status. Never partially applies: an order is either fully marked
/// Completed/Canceled or left exactly as it was.
pub struct OrderAggregator<S> {
    store: S,
}

impl<S: InventoryStore + OrderStore> OrderAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Marks the order Completed once every linked equipment shows the
    /// activity-matching transaction, or unconditionally when
    /// `ignore_issues` is set.
    ///
    /// Re-running against an already Completed order is a no-op success.
    /// Orders with no linked equipment are trivially completable.
    pub async fn complete(
        &self,
        order_id: OrderId,
        ignore_issues: bool,
    ) -> Result<Order, OrderError> {
        let mut order = self.store.order(order_id).await?;
        match order.status {
            OrderStatus::Completed => {
                info!(order = %order_id, "order already completed");
                return Ok(order);
            }
            OrderStatus::Canceled => {
                return Err(OrderError::Closed {
                    order: order_id,
                    status: order.status,
                })
            }
            _ => {}
        }

        if !ignore_issues {
            self.check_equipment_transactions(&order).await?;
            self.check_requested_products(&order).await?;
        }

        order.status = OrderStatus::Completed;
        self.store.save_order(&order).await?;
        info!(
            order = %order_id,
            activity = order.activity.as_str(),
            ignore_issues,
            "order completed"
        );
        Ok(order)
    }

    /// Cancels an order that has not yet reached a terminal status.
    pub async fn cancel(&self, order_id: OrderId) -> Result<Order, OrderError> {
        let mut order = self.store.order(order_id).await?;
        if order.status.is_terminal() {
            return Err(OrderError::Closed {
                order: order_id,
                status: order.status,
            });
        }
        order.status = OrderStatus::Canceled;
        self.store.save_order(&order).await?;
        info!(order = %order_id, "order canceled");
        Ok(order)
    }

    async fn check_equipment_transactions(&self, order: &Order) -> Result<(), OrderError> {
        let Some(expected) = order.activity.expected_action() else {
            return Ok(());
        };
        let mut missing = Vec::new();
        for equipment in self.store.order_equipment(order.id).await? {
            let transactions = self.store.transactions(equipment).await?;
            if !transactions.iter().any(|t| t.action == expected) {
                missing.push(equipment);
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            warn!(
                order = %order.id,
                expected = expected.name(),
                missing = missing.len(),
                "order completion blocked by equipment without the expected transaction"
            );
            Err(OrderError::Incomplete {
                order: order.id,
                expected,
                equipment: missing,
            })
        }
    }

    /// Deploy orders with recorded product requirements must be filled by
    /// exactly the requested quantities. Orders without recorded
    /// requirements skip the reconciliation.
    async fn check_requested_products(&self, order: &Order) -> Result<(), OrderError> {
        if order.activity != OrderActivity::Deploy {
            return Ok(());
        }
        let requirements = self.store.requested_products(order.id).await?;
        if requirements.is_empty() {
            return Ok(());
        }

        let mut remaining: HashMap<GenericProductId, i64> = requirements
            .iter()
            .map(|r| (r.generic_product, i64::from(r.quantity)))
            .collect();
        for equipment_id in self.store.order_equipment(order.id).await? {
            let equipment = self.store.equipment(equipment_id).await?;
            match equipment
                .generic_product
                .and_then(|product| remaining.get_mut(&product))
            {
                Some(count) => *count -= 1,
                None => {
                    return Err(OrderError::UnrequestedEquipment {
                        order: order.id,
                        equipment: equipment_id,
                    })
                }
            }
        }
        if remaining.values().any(|&count| count != 0) {
            return Err(OrderError::QuantityMismatch { order: order.id });
        }
        Ok(())
    }
}
