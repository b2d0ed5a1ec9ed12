// Shared builders for integration tests
#![allow(dead_code)]

use chrono::Utc;
use fieldstock::inventory::types::{
    ActionKind, CustomerId, Equipment, GenericProductId, LocationId, Stock, StockId, User,
};
use fieldstock::orders::types::{Order, OrderActivity};
use fieldstock::{Condition, MemoryStore};

/// A condition that permits every action kind.
pub fn fully_working_condition() -> Condition {
    Condition::new("Working", "Fully functional", ActionKind::ALL)
}

pub fn condition_permitting(allowed: impl IntoIterator<Item = ActionKind>) -> Condition {
    Condition::new("Restricted", "Limited use", allowed)
}

pub fn stock(name: &str) -> Stock {
    Stock {
        id: StockId::new(),
        name: name.to_string(),
        location: LocationId::new(),
    }
}

pub fn technician(name: &str) -> User {
    User::new(name)
}

/// Seeds one equipment unit with a condition permitting everything.
pub fn seed_equipment(store: &MemoryStore, name: &str) -> Equipment {
    let equipment = Equipment::new(name, fully_working_condition());
    store.add_equipment(equipment.clone());
    equipment
}

/// Seeds one equipment unit carrying a generic product reference.
pub fn seed_product_equipment(
    store: &MemoryStore,
    name: &str,
    product: GenericProductId,
) -> Equipment {
    let mut equipment = Equipment::new(name, fully_working_condition());
    equipment.generic_product = Some(product);
    store.add_equipment(equipment.clone());
    equipment
}

/// Seeds a new order for today at a fresh customer location.
pub fn seed_order(store: &MemoryStore, activity: OrderActivity) -> Order {
    let order = Order::new(activity, CustomerId::new(), LocationId::new(), Utc::now());
    store.add_order(order.clone());
    order
}
