//! Ticket lifecycle state.

use serde::{Deserialize, Serialize};

/// Lifecycle of one ticket.
///
/// State transitions:
/// - Waiting -> InService (call-next pops it from its desk's queue)
/// - InService -> Completed (the next call-next on the same desk displaces it)
/// - InService -> Waiting (skip re-queues it at the tail of the same desk)
///
/// There is no explicit "finish" operation: completion only happens when a
/// desk calls again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    /// Waiting in exactly one desk's queue.
    Waiting,

    /// Occupying exactly one desk's in-service slot.
    InService,

    /// Served; present in no queue and no slot.
    Completed,
}

impl TicketState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketState::Completed)
    }

    /// Live tickets must be placed somewhere in the desk state.
    pub fn is_live(self) -> bool {
        !self.is_terminal()
    }
}
