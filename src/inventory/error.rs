// Error taxonomy for the lifecycle engine and its storage seam

use thiserror::Error;

use super::types::{ActionKind, EquipmentId, UserId};

/// Failures of a single action execution. Every variant carries the offending
/// entity so callers can render a user-facing message; none of these are
/// retried inside the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing action parameters. Caller error, never retried.
    #[error("invalid action parameters: {reason}")]
    Validation { reason: String },

    /// The injected authorization policy rejected the caller.
    #[error("user {user} is not authorized to perform {kind} on equipment {equipment}")]
    Authorization {
        user: UserId,
        equipment: EquipmentId,
        kind: ActionKind,
    },

    /// The equipment's effective condition does not permit this action kind.
    #[error("equipment {equipment} in condition {condition} cannot use action {kind}")]
    Condition {
        equipment: EquipmentId,
        condition: String,
        kind: ActionKind,
    },

    /// A domain rule scoped to the transaction itself, e.g. a self-transfer.
    #[error("equipment {equipment}: {reason}")]
    Transaction {
        equipment: EquipmentId,
        reason: String,
    },

    /// Storage-layer fault. Nothing was committed; the caller may retry the
    /// whole action.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Failures surfaced by `InventoryStore` / `OrderStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The read-modify-write lost a race: the record changed since it was
    /// loaded.
    #[error("equipment {id} was modified concurrently (expected version {expected})")]
    Conflict { id: EquipmentId, expected: u64 },

    #[error("storage backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend {
            message: err.to_string(),
        }
    }
}
