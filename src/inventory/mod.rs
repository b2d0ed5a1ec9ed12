// Equipment lifecycle - condition gating, action engine, transaction ledger
//
// The engine validates and executes one state transition at a time against
// injected storage and authorization seams; every successful execution leaves
// exactly one append-only ledger entry behind.

pub mod action;
pub mod condition;
pub mod engine;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;


pub use action::Action;
pub use condition::Condition;
pub use engine::{ActionEngine, MAX_ACTION_NAME_LEN};
pub use error::{EngineError, StoreError};
pub use memory::MemoryStore;
pub use traits::{AllowAll, AuthorizationPolicy, InventoryStore, OrderStore};
pub use types::{
    ActionKind, ConditionId, CustomerId, Equipment, EquipmentId, EquipmentStatus,
    EquipmentTransaction, GenericProductId, LocationId, OrderId, Stock, StockId, TransactionId,
    User, UserId,
};
