// Order records - grouping equipment transitions under one customer visit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inventory::types::{ActionKind, CustomerId, GenericProductId, LocationId, OrderId};

/// What the field team is sent out to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderActivity {
    Deploy,
    Collect,
    Inspect,
}

impl OrderActivity {
    /// The per-equipment transaction kind a completed order of this activity
    /// expects. Inspections leave no per-unit requirement.
    pub fn expected_action(&self) -> Option<ActionKind> {
        match self {
            OrderActivity::Deploy => Some(ActionKind::Deploy),
            OrderActivity::Collect => Some(ActionKind::PickUp),
            OrderActivity::Inspect => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderActivity::Deploy => "Deploy",
            OrderActivity::Collect => "Collect",
            OrderActivity::Inspect => "Inspect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            OrderActivity::Deploy,
            OrderActivity::Collect,
            OrderActivity::Inspect,
        ]
        .into_iter()
        .find(|activity| activity.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Assigned,
    Active,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::Active => "Active",
            OrderStatus::Completed => "Completed",
            OrderStatus::Canceled => "Canceled",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            OrderStatus::New,
            OrderStatus::Assigned,
            OrderStatus::Active,
            OrderStatus::Completed,
            OrderStatus::Canceled,
        ]
        .into_iter()
        .find(|status| status.as_str() == name)
    }
}

/// One scheduled customer visit. Created New and moved forward as work
/// proceeds; Completed and Canceled are terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub activity: OrderActivity,
    pub status: OrderStatus,
    pub customer: CustomerId,
    pub location: LocationId,
    pub date: DateTime<Utc>,
}

impl Order {
    pub fn new(
        activity: OrderActivity,
        customer: CustomerId,
        location: LocationId,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            activity,
            status: OrderStatus::New,
            customer,
            location,
            date,
        }
    }
}

/// Quantity of a generic product an order is expected to be filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRequirement {
    pub generic_product: GenericProductId,
    pub quantity: u32,
}
