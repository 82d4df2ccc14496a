//! Status - read-only projections for the presentation side.

use serde::{Deserialize, Serialize};

use crate::domain::{CustomerRecord, DeskId, Identity, QueueError};
use crate::queue::{EngineState, InvariantViolation, Placement};

/// Where a ticket is, as answered to "where am I".
///
/// `Unknown` covers both "never registered" and "already served". Use
/// [`QueueEngine::lookup`](super::QueueEngine::lookup) to tell those apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TicketStatus {
    InService { desk: DeskId },
    Waiting { desk: DeskId, position: usize },
    Unknown,
}

impl From<Placement> for TicketStatus {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::InService(desk) => TicketStatus::InService { desk },
            Placement::Waiting { desk, position } => TicketStatus::Waiting { desk, position },
            Placement::Nowhere => TicketStatus::Unknown,
        }
    }
}

impl TicketStatus {
    pub fn of(state: &EngineState, identity: &Identity) -> Self {
        state.locate(identity).into()
    }
}

/// What one desk looks like right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskStatus {
    pub desk: DeskId,
    pub in_service: Option<CustomerRecord>,

    /// Waiting line, head first. Position = index + 1.
    pub waiting: Vec<CustomerRecord>,
}

impl DeskStatus {
    pub fn project(state: &EngineState, desk: DeskId) -> Result<Self, QueueError> {
        let queue = state.desk(desk)?;
        let resolve = |identity: &Identity| {
            state.registry.get(identity).cloned().ok_or_else(|| {
                InvariantViolation::UnregisteredTicket {
                    desk,
                    identity: identity.clone(),
                }
            })
        };

        let in_service = queue.in_service().map(resolve).transpose()?;
        let waiting = queue
            .waiting()
            .map(resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            desk,
            in_service,
            waiting,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::DeskSelector;
    use chrono::Utc;

    fn id(raw: &str) -> Identity {
        Identity::parse(raw).unwrap()
    }

    #[test]
    fn projection_lists_records_in_order() {
        let mut state = EngineState::new(&[DeskId::new(1)]);
        let selector = DeskSelector::default();
        let desk = DeskId::new(1);
        for (raw, name) in [("111111111111", "An"), ("222222222222", "Binh"), ("333333333333", "Chi")] {
            state.register(&selector, id(raw), name, Utc::now()).unwrap();
        }
        state.call_next(desk, Utc::now()).unwrap();

        let status = DeskStatus::project(&state, desk).unwrap();
        assert_eq!(status.in_service.unwrap().name, "An");
        let names: Vec<_> = status.waiting.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Binh", "Chi"]);
        assert_eq!(status.waiting[0].ticket.get(), 2);
    }

    #[test]
    fn position_is_one_based() {
        let mut state = EngineState::new(&[DeskId::new(1)]);
        let selector = DeskSelector::default();
        state.register(&selector, id("111111111111"), "An", Utc::now()).unwrap();
        state.register(&selector, id("222222222222"), "Binh", Utc::now()).unwrap();

        assert_eq!(
            TicketStatus::of(&state, &id("222222222222")),
            TicketStatus::Waiting { desk: DeskId::new(1), position: 2 }
        );
    }

    #[test]
    fn unknown_desk_cannot_be_projected() {
        let state = EngineState::new(&[DeskId::new(1)]);
        assert!(matches!(
            DeskStatus::project(&state, DeskId::new(3)),
            Err(QueueError::UnknownDesk(_))
        ));
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_value(TicketStatus::InService { desk: DeskId::new(2) }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "in_service", "desk": 2 }));
    }
}
