// Orders - customer visits grouping equipment transitions
//
// The aggregator judges completion against the transaction ledger; the state
// machine drives a single order's forward-only status flow.

pub mod aggregator;
pub mod state_machine;
pub mod types;

pub use aggregator::{OrderAggregator, OrderError};
pub use state_machine::{OrderEvent, OrderStateMachine};
pub use types::{Order, OrderActivity, OrderStatus, ProductRequirement};
