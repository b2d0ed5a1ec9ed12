// Action/Transaction Engine - validates and executes one equipment state
// transition as a single atomic unit of work

use chrono::Utc;
use tracing::{info, warn};

use super::action::Action;
use super::error::EngineError;
use super::traits::{AuthorizationPolicy, InventoryStore};
use super::types::{
    Equipment, EquipmentStatus, EquipmentTransaction, Stock, StockId, TransactionId, UserId,
};

/// Width of the ledger's action-name column. Kept as a named check so a new
/// action kind that would not fit the column fails loudly instead of being
/// truncated on write.
pub const MAX_ACTION_NAME_LEN: usize = 32;

/// Validates and executes equipment actions against an injected store and
/// authorization policy.
///
/// On success exactly one ledger entry is written together with the new
/// equipment state; on any failure nothing is written and the equipment is
/// left exactly as it was.
pub struct ActionEngine<S, P> {
    store: S,
    policy: P,
}

impl<S: InventoryStore, P: AuthorizationPolicy> ActionEngine<S, P> {
    pub fn new(store: S, policy: P) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Executes a single state transition.
    ///
    /// Validation order: action-name length, authorization, condition
    /// gating, then kind-specific structural checks. The first failure wins
    /// and no write is attempted.
    pub async fn execute(&self, action: Action) -> Result<EquipmentTransaction, EngineError> {
        let kind = action.kind();
        if kind.name().len() > MAX_ACTION_NAME_LEN {
            return Err(EngineError::Validation {
                reason: format!(
                    "action name '{}' exceeds {MAX_ACTION_NAME_LEN} characters",
                    kind.name()
                ),
            });
        }

        let mut equipment = self.store.equipment(action.equipment_id()).await?;
        let user = action.user().clone();

        if !self.policy.is_authorized(&user, &equipment, kind) {
            warn!(
                equipment = %equipment.id,
                user = %user.id,
                action = kind.name(),
                "action rejected by authorization policy"
            );
            return Err(EngineError::Authorization {
                user: user.id,
                equipment: equipment.id,
                kind,
            });
        }

        // Decommissioned is terminal regardless of what the condition would
        // otherwise permit.
        if equipment.status == EquipmentStatus::Decommissioned {
            return Err(EngineError::Transaction {
                equipment: equipment.id,
                reason: "equipment is decommissioned".into(),
            });
        }

        let condition = action
            .condition_override()
            .cloned()
            .unwrap_or_else(|| equipment.condition.clone());
        if !condition.permits(kind) {
            return Err(EngineError::Condition {
                equipment: equipment.id,
                condition: condition.name.clone(),
                kind,
            });
        }

        let expected_version = equipment.version;
        let (stock, recipient) = self.apply(&action, &mut equipment).await?;

        equipment.condition = condition.clone();
        equipment.version += 1;

        let transaction = EquipmentTransaction {
            id: TransactionId::new(),
            equipment: equipment.id,
            action: kind,
            user: user.id,
            condition: condition.id,
            stock,
            recipient,
            timestamp: Utc::now(),
        };

        self.store
            .commit_action(&equipment, expected_version, &transaction)
            .await?;

        info!(
            equipment = %equipment.id,
            action = kind.name(),
            user = %user.id,
            status = equipment.status.as_str(),
            transaction = %transaction.id,
            "equipment action executed"
        );
        Ok(transaction)
    }

    /// Kind-specific structural checks plus the state mutation table.
    /// Returns the stock and recipient to record on the ledger entry.
    async fn apply(
        &self,
        action: &Action,
        equipment: &mut Equipment,
    ) -> Result<(Option<StockId>, Option<UserId>), EngineError> {
        match action {
            Action::Store { stock, .. } => {
                let stock = self
                    .resolve_stock(stock.as_ref(), equipment)
                    .await?
                    .ok_or_else(|| EngineError::Validation {
                        reason: format!(
                            "a destination stock must be supplied when storing equipment {}",
                            equipment.id
                        ),
                    })?;
                equipment.status = EquipmentStatus::Stored;
                equipment.holder = None;
                equipment.stock = Some(stock.id);
                equipment.location = Some(stock.location);
                Ok((Some(stock.id), None))
            }
            Action::PickUp { user, stock, .. } => {
                let stock = self.resolve_stock(stock.as_ref(), equipment).await?;
                equipment.status = EquipmentStatus::PickedUp;
                equipment.holder = Some(user.id);
                if let Some(stock) = &stock {
                    equipment.stock = Some(stock.id);
                    equipment.location = Some(stock.location);
                }
                Ok((stock.map(|s| s.id), None))
            }
            Action::Deploy { location, .. } => {
                equipment.status = EquipmentStatus::Deployed;
                equipment.location = Some(*location);
                Ok((None, None))
            }
            Action::Transfer {
                user, recipient, ..
            } => {
                if recipient.id == user.id {
                    return Err(EngineError::Transaction {
                        equipment: equipment.id,
                        reason: "cannot transfer equipment to the acting user".into(),
                    });
                }
                equipment.status = EquipmentStatus::PickedUp;
                equipment.holder = Some(recipient.id);
                equipment.location = recipient.location;
                Ok((None, Some(recipient.id)))
            }
            Action::Decommission { .. } => {
                equipment.status = EquipmentStatus::Decommissioned;
                equipment.holder = None;
                equipment.stock = None;
                Ok((None, None))
            }
            Action::Withdraw { user, .. } => {
                equipment.status = EquipmentStatus::PickedUp;
                equipment.holder = Some(user.id);
                Ok((None, None))
            }
        }
    }

    /// Destination stock is the supplied one, falling back to the stock
    /// already on the equipment. `None` when neither exists.
    async fn resolve_stock(
        &self,
        supplied: Option<&Stock>,
        equipment: &Equipment,
    ) -> Result<Option<Stock>, EngineError> {
        if let Some(stock) = supplied {
            return Ok(Some(stock.clone()));
        }
        match equipment.stock {
            Some(id) => Ok(Some(self.store.stock(id).await?)),
            None => Ok(None),
        }
    }
}
