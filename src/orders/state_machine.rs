// Order lifecycle state machine
//
// In-memory driver for one order's progression through its working day:
// New -> Assigned -> Active -> Completed / Canceled. Completion policy
// (ledger checks, overrides) lives in the aggregator; this machine only
// enforces the forward-only status flow for the coordinating layer.

use statig::prelude::*;

use super::types::{OrderActivity, OrderStatus};
use crate::inventory::types::{OrderId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    Assign { team_lead: UserId },
    Start,
    Complete,
    Cancel,
}

pub struct OrderStateMachine {
    pub order_id: OrderId,
    pub activity: OrderActivity,
    pub team_lead: Option<UserId>,
}

impl OrderStateMachine {
    pub fn new(order_id: OrderId, activity: OrderActivity) -> Self {
        Self {
            order_id,
            activity,
            team_lead: None,
        }
    }
}

#[state_machine(initial = "State::new_order()")]
impl OrderStateMachine {
    #[state]
    fn new_order(&mut self, event: &OrderEvent) -> Response<State> {
        match event {
            OrderEvent::Assign { team_lead } => {
                self.team_lead = Some(*team_lead);
                tracing::info!(
                    order = %self.order_id,
                    team_lead = %team_lead,
                    "order assigned"
                );
                Transition(State::assigned())
            }
            OrderEvent::Cancel => {
                tracing::info!(order = %self.order_id, "order canceled before assignment");
                Transition(State::canceled())
            }
            _ => Handled,
        }
    }

    #[state]
    fn assigned(&mut self, event: &OrderEvent) -> Response<State> {
        match event {
            OrderEvent::Assign { team_lead } => {
                // Reassignment before work starts just swaps the lead.
                self.team_lead = Some(*team_lead);
                Handled
            }
            OrderEvent::Start => {
                tracing::info!(order = %self.order_id, "order work started");
                Transition(State::active())
            }
            OrderEvent::Cancel => {
                tracing::info!(order = %self.order_id, "order canceled");
                Transition(State::canceled())
            }
            _ => Handled,
        }
    }

    #[state]
    fn active(&mut self, event: &OrderEvent) -> Response<State> {
        match event {
            OrderEvent::Complete => {
                tracing::info!(
                    order = %self.order_id,
                    activity = self.activity.as_str(),
                    "order completed"
                );
                Transition(State::completed())
            }
            OrderEvent::Cancel => {
                tracing::info!(order = %self.order_id, "order canceled mid-work");
                Transition(State::canceled())
            }
            _ => Handled,
        }
    }

    #[state]
    fn completed(&mut self, event: &OrderEvent) -> Response<State> {
        let _ = event;
        // Terminal: absorbs everything.
        Handled
    }

    #[state]
    fn canceled(&mut self, event: &OrderEvent) -> Response<State> {
        let _ = event;
        Handled
    }
}

impl OrderStateMachine {
    /// Maps a machine state onto the persisted status value.
    pub fn status_of(state: &State) -> OrderStatus {
        match state {
            State::NewOrder { .. } => OrderStatus::New,
            State::Assigned { .. } => OrderStatus::Assigned,
            State::Active { .. } => OrderStatus::Active,
            State::Completed { .. } => OrderStatus::Completed,
            State::Canceled { .. } => OrderStatus::Canceled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> statig::blocking::StateMachine<OrderStateMachine> {
        OrderStateMachine::new(OrderId::new(), OrderActivity::Deploy).state_machine()
    }

    #[test]
    fn order_moves_forward_through_the_lifecycle() {
        let mut sm = machine();
        assert_eq!(OrderStateMachine::status_of(sm.state()), OrderStatus::New);

        sm.handle(&OrderEvent::Assign {
            team_lead: UserId::new(),
        });
        assert_eq!(
            OrderStateMachine::status_of(sm.state()),
            OrderStatus::Assigned
        );

        sm.handle(&OrderEvent::Start);
        assert_eq!(OrderStateMachine::status_of(sm.state()), OrderStatus::Active);

        sm.handle(&OrderEvent::Complete);
        assert_eq!(
            OrderStateMachine::status_of(sm.state()),
            OrderStatus::Completed
        );
    }

    #[test]
    fn completion_requires_active_work() {
        let mut sm = machine();

        // Complete straight from New is ignored.
        sm.handle(&OrderEvent::Complete);
        assert_eq!(OrderStateMachine::status_of(sm.state()), OrderStatus::New);

        sm.handle(&OrderEvent::Assign {
            team_lead: UserId::new(),
        });
        sm.handle(&OrderEvent::Complete);
        assert_eq!(
            OrderStateMachine::status_of(sm.state()),
            OrderStatus::Assigned
        );
    }

    #[test]
    fn terminal_states_absorb_events() {
        let mut sm = machine();
        sm.handle(&OrderEvent::Cancel);
        assert_eq!(
            OrderStateMachine::status_of(sm.state()),
            OrderStatus::Canceled
        );

        sm.handle(&OrderEvent::Assign {
            team_lead: UserId::new(),
        });
        sm.handle(&OrderEvent::Start);
        sm.handle(&OrderEvent::Complete);
        assert_eq!(
            OrderStateMachine::status_of(sm.state()),
            OrderStatus::Canceled
        );
    }
}
