//! Events - ドメインイベント
//!
//! Emitted to the [`EventSink`](crate::ports::EventSink) after a mutation
//! has been committed. The presentation side renders and announces them.

use serde::{Deserialize, Serialize};

use super::ids::{DeskId, Identity, TicketNumber};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    TicketIssued {
        identity: Identity,
        ticket: TicketNumber,
        desk: DeskId,
        position: usize,
    },

    /// "Customer X, number N, please go to desk D."
    CustomerCalled {
        desk: DeskId,
        identity: Identity,
        name: String,
        ticket: TicketNumber,
    },

    TicketCompleted {
        desk: DeskId,
        identity: Identity,
        ticket: TicketNumber,
    },

    TicketSkipped {
        desk: DeskId,
        identity: Identity,
        ticket: TicketNumber,
    },

    /// A call found nothing waiting; the desk's slot is now empty.
    DeskIdle { desk: DeskId },

    Reset,
}

impl DomainEvent {
    /// Desk the event concerns, if any.
    pub fn desk(&self) -> Option<DeskId> {
        match self {
            DomainEvent::TicketIssued { desk, .. }
            | DomainEvent::CustomerCalled { desk, .. }
            | DomainEvent::TicketCompleted { desk, .. }
            | DomainEvent::TicketSkipped { desk, .. }
            | DomainEvent::DeskIdle { desk } => Some(*desk),
            DomainEvent::Reset => None,
        }
    }

    /// Human-readable announcement for a call, as read out at the counter.
    pub fn announcement(&self) -> Option<String> {
        match self {
            DomainEvent::CustomerCalled {
                desk, name, ticket, ..
            } => Some(format!(
                "Customer {name}, number {ticket}, please go to desk {desk}"
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_calls_are_announced() {
        let called = DomainEvent::CustomerCalled {
            desk: DeskId::new(1),
            identity: Identity::parse("111111111111").unwrap(),
            name: "An".into(),
            ticket: TicketNumber::new(3),
        };
        assert_eq!(
            called.announcement().as_deref(),
            Some("Customer An, number 3, please go to desk 1")
        );
        assert_eq!(called.desk(), Some(DeskId::new(1)));

        assert!(DomainEvent::DeskIdle { desk: DeskId::new(2) }.announcement().is_none());
        assert_eq!(DomainEvent::Reset.desk(), None);
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(DomainEvent::DeskIdle { desk: DeskId::new(2) }).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "desk_idle", "desk": 2 }));
    }
}
