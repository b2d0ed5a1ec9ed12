// Core types for the equipment lifecycle engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

id_type!(EquipmentId);
id_type!(UserId);
id_type!(StockId);
id_type!(LocationId);
id_type!(ConditionId);
id_type!(TransactionId);
id_type!(OrderId);
id_type!(CustomerId);
id_type!(GenericProductId);

/// The six equipment state transitions the engine knows how to execute.
/// Adding a kind here is a single enum addition; the condition registry and
/// the mutation table dispatch on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Store,
    PickUp,
    Deploy,
    Transfer,
    Decommission,
    Withdraw,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Store,
        ActionKind::PickUp,
        ActionKind::Deploy,
        ActionKind::Transfer,
        ActionKind::Decommission,
        ActionKind::Withdraw,
    ];

    /// Ledger name of the action, as recorded on transactions.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Store => "Store",
            ActionKind::PickUp => "Pick Up",
            ActionKind::Deploy => "Deploy",
            ActionKind::Transfer => "Transfer",
            ActionKind::Decommission => "Decommission",
            ActionKind::Withdraw => "Withdraw",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a piece of equipment currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    /// Resting at a stock location.
    Stored,
    /// With an employee, in transit or awaiting deployment.
    PickedUp,
    /// Installed at a customer location.
    Deployed,
    /// Cannot be found; set through administrative paths, never by an action.
    Missing,
    /// Terminal. The record is kept for the audit trail.
    Decommissioned,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Stored => "Stored",
            EquipmentStatus::PickedUp => "Picked Up",
            EquipmentStatus::Deployed => "Deployed",
            EquipmentStatus::Missing => "Missing",
            EquipmentStatus::Decommissioned => "Decommissioned",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            EquipmentStatus::Stored,
            EquipmentStatus::PickedUp,
            EquipmentStatus::Deployed,
            EquipmentStatus::Missing,
            EquipmentStatus::Decommissioned,
        ]
        .into_iter()
        .find(|status| status.as_str() == name)
    }
}

/// A storage place where equipment resides when not deployed or held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: StockId,
    pub name: String,
    pub location: LocationId,
}

/// Opaque identity reference. The engine only needs the id for attribution
/// and, for transfer recipients, the user's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub location: Option<LocationId>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            location: None,
        }
    }

    pub fn at(name: impl Into<String>, location: LocationId) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            location: Some(location),
        }
    }
}

/// One trackable physical unit. Mutated only through action execution and
/// never hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub status: EquipmentStatus,
    pub condition: super::condition::Condition,
    pub holder: Option<UserId>,
    pub stock: Option<StockId>,
    pub location: Option<LocationId>,
    pub generic_product: Option<GenericProductId>,
    /// Bumped on every committed action; the store refuses commits against a
    /// stale version so two racing actions cannot both apply.
    pub version: u64,
}

impl Equipment {
    pub fn new(name: impl Into<String>, condition: super::condition::Condition) -> Self {
        Self {
            id: EquipmentId::new(),
            name: name.into(),
            status: EquipmentStatus::Stored,
            condition,
            holder: None,
            stock: None,
            location: None,
            generic_product: None,
            version: 0,
        }
    }
}

/// Append-only ledger entry. Exactly one is written per successful action,
/// together with the equipment mutation; it is never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentTransaction {
    pub id: TransactionId,
    pub equipment: EquipmentId,
    pub action: ActionKind,
    pub user: UserId,
    pub condition: ConditionId,
    pub stock: Option<StockId>,
    pub recipient: Option<UserId>,
    pub timestamp: DateTime<Utc>,
}
