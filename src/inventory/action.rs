// Action command objects - one variant per equipment state transition

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::types::{ActionKind, EquipmentId, LocationId, Stock, User};

/// A requested equipment state transition. Constructed per invocation,
/// validated and executed once by the engine; its only durable trace is the
/// resulting `EquipmentTransaction`.
///
/// Each variant carries its own required and optional fields. Every variant
/// may override the equipment's condition; the override participates in the
/// condition-gating check and is written back on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Store equipment at a stock location. A destination stock must be
    /// resolvable: either supplied here or already on the equipment.
    Store {
        equipment: EquipmentId,
        user: User,
        stock: Option<Stock>,
        condition: Option<Condition>,
    },
    /// Pick up equipment from a customer location.
    PickUp {
        equipment: EquipmentId,
        user: User,
        stock: Option<Stock>,
        condition: Option<Condition>,
    },
    /// Deploy equipment at a customer location.
    Deploy {
        equipment: EquipmentId,
        user: User,
        location: LocationId,
        condition: Option<Condition>,
    },
    /// Hand equipment from the acting user to another user.
    Transfer {
        equipment: EquipmentId,
        user: User,
        recipient: User,
        condition: Option<Condition>,
    },
    /// Take equipment out of service permanently.
    Decommission {
        equipment: EquipmentId,
        user: User,
        condition: Option<Condition>,
    },
    /// Withdraw equipment from its stock location.
    Withdraw {
        equipment: EquipmentId,
        user: User,
        condition: Option<Condition>,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Store { .. } => ActionKind::Store,
            Action::PickUp { .. } => ActionKind::PickUp,
            Action::Deploy { .. } => ActionKind::Deploy,
            Action::Transfer { .. } => ActionKind::Transfer,
            Action::Decommission { .. } => ActionKind::Decommission,
            Action::Withdraw { .. } => ActionKind::Withdraw,
        }
    }

    pub fn equipment_id(&self) -> EquipmentId {
        match self {
            Action::Store { equipment, .. }
            | Action::PickUp { equipment, .. }
            | Action::Deploy { equipment, .. }
            | Action::Transfer { equipment, .. }
            | Action::Decommission { equipment, .. }
            | Action::Withdraw { equipment, .. } => *equipment,
        }
    }

    pub fn user(&self) -> &User {
        match self {
            Action::Store { user, .. }
            | Action::PickUp { user, .. }
            | Action::Deploy { user, .. }
            | Action::Transfer { user, .. }
            | Action::Decommission { user, .. }
            | Action::Withdraw { user, .. } => user,
        }
    }

    pub fn condition_override(&self) -> Option<&Condition> {
        match self {
            Action::Store { condition, .. }
            | Action::PickUp { condition, .. }
            | Action::Deploy { condition, .. }
            | Action::Transfer { condition, .. }
            | Action::Decommission { condition, .. }
            | Action::Withdraw { condition, .. } => condition.as_ref(),
        }
    }
}
