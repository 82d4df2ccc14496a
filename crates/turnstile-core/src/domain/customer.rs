//! Customer record: identity + ticket + lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{Identity, TicketNumber};
use super::state::TicketState;

/// One registered customer and the ticket issued to them.
///
/// Design:
/// - Identity and ticket number are fixed at registration.
/// - Desk queues hold the identity only; this record is the single place
///   the lifecycle state lives.
/// - Transitions go through the methods below, never via direct writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub identity: Identity,
    pub name: String,
    pub ticket: TicketNumber,
    pub state: TicketState,

    pub issued_at: DateTime<Utc>,

    /// Most recent time the ticket was called to a desk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub called_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CustomerRecord {
    pub fn new(
        identity: Identity,
        name: impl Into<String>,
        ticket: TicketNumber,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity,
            name: name.into(),
            ticket,
            state: TicketState::Waiting,
            issued_at,
            called_at: None,
            completed_at: None,
        }
    }

    /// Called to a desk.
    pub fn start_service(&mut self, now: DateTime<Utc>) {
        self.state = TicketState::InService;
        self.called_at = Some(now);
    }

    /// Displaced from the in-service slot by the next call.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.state = TicketState::Completed;
        self.completed_at = Some(now);
    }

    /// Skipped back into the queue.
    pub fn requeue(&mut self) {
        self.state = TicketState::Waiting;
    }
}
