// Fieldstock - field-service equipment inventory core
// Condition-gated actions, an append-only transaction ledger, and order
// completion checks, behind pluggable storage.

pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod inventory;
pub mod orders;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, init_config, FieldstockConfig};
#[cfg(feature = "database")]
pub use database::SqliteStore;
pub use inventory::{
    Action, ActionEngine, ActionKind, AllowAll, AuthorizationPolicy, Condition, EngineError,
    Equipment, EquipmentStatus, EquipmentTransaction, InventoryStore, MemoryStore, OrderStore,
    StoreError,
};
pub use orders::{
    Order, OrderActivity, OrderAggregator, OrderError, OrderEvent, OrderStateMachine, OrderStatus,
    ProductRequirement,
};
pub use telemetry::{
    create_action_span, generate_correlation_id, init_telemetry, shutdown_telemetry,
};
