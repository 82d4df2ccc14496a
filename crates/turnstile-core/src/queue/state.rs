//! Engine state: registry + desks, and every transition on them.
//!
//! Transitions here are synchronous and do no I/O. Each one either returns
//! an error having left `self` untouched *in value* (callers apply them to a
//! working copy), or returns the events describing what changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{DeskLoad, DeskQueue, DeskSelector, TicketRegistry, TieBreak};
use crate::domain::{
    CustomerRecord, DeskId, DomainEvent, Identity, QueueError, TicketNumber, TicketState,
};

/// A broken cross-entity invariant, found by [`EngineState::verify`] or while
/// applying a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("no desks configured")]
    NoDesks,

    #[error("desk {0} appears more than once")]
    DuplicateDesk(DeskId),

    #[error("desk {desk} references unregistered identity {identity}")]
    UnregisteredTicket { desk: DeskId, identity: Identity },

    #[error("identity {0} is placed more than once")]
    PlacedTwice(Identity),

    #[error("identity {identity} is {state:?} but placed nowhere")]
    Unplaced { identity: Identity, state: TicketState },

    #[error("identity {identity} is {found:?} where {expected:?} was expected")]
    StateMismatch {
        identity: Identity,
        expected: TicketState,
        found: TicketState,
    },

    #[error("ticket {0} is issued more than once")]
    DuplicateTicket(TicketNumber),

    #[error("ticket {ticket} is above the last issued number {last:?}")]
    TicketAboveLastIssued {
        ticket: TicketNumber,
        last: Option<TicketNumber>,
    },
}

/// Where a ticket currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    InService(DeskId),
    Waiting { desk: DeskId, position: usize },
    Nowhere,
}

/// Result of a successful registration, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub ticket: TicketNumber,
    pub desk: DeskId,
    pub position: usize,
}

/// What a transition produced: its return value and the events to emit.
///
/// No events means nothing changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub value: T,
    pub events: Vec<DomainEvent>,
}

impl<T> Applied<T> {
    pub fn changed(&self) -> bool {
        !self.events.is_empty()
    }
}

/// The whole shared queue state. This is also the persisted unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub registry: TicketRegistry,

    /// Sorted by desk id; the order is the tie-break priority.
    desks: Vec<DeskQueue>,

    /// Desk that received the latest ticket under `TieBreak::RoundRobin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_assigned: Option<DeskId>,
}

impl EngineState {
    /// Fresh state with one empty queue per desk.
    pub fn new(desk_ids: &[DeskId]) -> Self {
        let mut ids = desk_ids.to_vec();
        ids.sort();
        ids.dedup();
        Self {
            registry: TicketRegistry::new(),
            desks: ids.into_iter().map(DeskQueue::new).collect(),
            last_assigned: None,
        }
    }

    pub fn desks(&self) -> &[DeskQueue] {
        &self.desks
    }

    pub fn desk_ids(&self) -> Vec<DeskId> {
        self.desks.iter().map(DeskQueue::id).collect()
    }

    pub fn desk(&self, desk: DeskId) -> Result<&DeskQueue, QueueError> {
        let index = self.desk_index(desk)?;
        Ok(&self.desks[index])
    }

    pub fn last_assigned(&self) -> Option<DeskId> {
        self.last_assigned
    }

    pub fn loads(&self) -> Vec<DeskLoad> {
        self.desks
            .iter()
            .map(|desk| DeskLoad {
                desk: desk.id(),
                waiting: desk.waiting_len(),
            })
            .collect()
    }

    fn desk_index(&self, desk: DeskId) -> Result<usize, QueueError> {
        self.desks
            .binary_search_by_key(&desk, DeskQueue::id)
            .map_err(|_| QueueError::UnknownDesk(desk))
    }

    /// In-service slots are checked before waiting lines.
    pub fn locate(&self, identity: &Identity) -> Placement {
        if let Some(desk) = self
            .desks
            .iter()
            .find(|desk| desk.in_service() == Some(identity))
        {
            return Placement::InService(desk.id());
        }
        self.desks
            .iter()
            .find_map(|desk| {
                desk.position_of(identity).map(|position| Placement::Waiting {
                    desk: desk.id(),
                    position,
                })
            })
            .unwrap_or(Placement::Nowhere)
    }

    /// Issue a ticket and place it on the least busy desk.
    pub fn register(
        &mut self,
        selector: &DeskSelector,
        identity: Identity,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Applied<Registration>, QueueError> {
        let ticket = self.registry.register(identity.clone(), name, now)?;

        let selection = selector
            .select(&self.loads(), self.last_assigned)
            .ok_or(InvariantViolation::NoDesks)?;
        if selection.tie_broken {
            debug!(desk = %selection.desk, tie_break = ?selector.tie_break, "tie broken");
        }
        if selector.tie_break == TieBreak::RoundRobin {
            self.last_assigned = Some(selection.desk);
        }

        let index = self.desk_index(selection.desk)?;
        let position = self.desks[index].enqueue(identity.clone());

        let registration = Registration {
            ticket,
            desk: selection.desk,
            position,
        };
        Ok(Applied {
            value: registration,
            events: vec![DomainEvent::TicketIssued {
                identity,
                ticket,
                desk: selection.desk,
                position,
            }],
        })
    }

    /// Complete the current ticket (if any) and call the head of the line.
    ///
    /// An empty line clears the slot and yields `None`. On an idle desk this
    /// changes nothing and produces no events.
    pub fn call_next(
        &mut self,
        desk: DeskId,
        now: DateTime<Utc>,
    ) -> Result<Applied<Option<CustomerRecord>>, QueueError> {
        let index = self.desk_index(desk)?;
        let mut events = Vec::new();

        if let Some(previous) = self.desks[index].take_in_service() {
            let record = self.record_mut(desk, &previous)?;
            record.complete(now);
            events.push(DomainEvent::TicketCompleted {
                desk,
                identity: previous,
                ticket: record.ticket,
            });
        }

        let Some(next) = self.desks[index].dequeue_head() else {
            if !events.is_empty() {
                events.push(DomainEvent::DeskIdle { desk });
            }
            return Ok(Applied {
                value: None,
                events,
            });
        };

        self.desks[index].set_in_service(Some(next.clone()));
        let record = self.record_mut(desk, &next)?;
        record.start_service(now);
        let called = record.clone();

        events.push(DomainEvent::CustomerCalled {
            desk,
            identity: called.identity.clone(),
            name: called.name.clone(),
            ticket: called.ticket,
        });
        Ok(Applied {
            value: Some(called),
            events,
        })
    }

    /// Send the in-service ticket to the back of its own desk's line, then
    /// call the next one.
    ///
    /// With an otherwise empty line the skipped ticket is called straight
    /// back.
    pub fn skip(
        &mut self,
        desk: DeskId,
        now: DateTime<Utc>,
    ) -> Result<Applied<CustomerRecord>, QueueError> {
        let index = self.desk_index(desk)?;
        let current = self.desks[index]
            .take_in_service()
            .ok_or(QueueError::NothingInService(desk))?;

        let record = self.record_mut(desk, &current)?;
        record.requeue();
        let skipped = DomainEvent::TicketSkipped {
            desk,
            identity: current.clone(),
            ticket: record.ticket,
        };
        self.desks[index].enqueue(current.clone());

        let called = self.call_next(desk, now)?;
        let Some(record) = called.value else {
            return Err(InvariantViolation::Unplaced {
                identity: current,
                state: TicketState::Waiting,
            }
            .into());
        };

        let mut events = vec![skipped];
        events.extend(called.events);
        Ok(Applied {
            value: record,
            events,
        })
    }

    /// Drop every customer and every queue entry; numbering restarts at 1.
    pub fn reset(&mut self) -> Applied<()> {
        self.registry.clear();
        for desk in &mut self.desks {
            desk.clear();
        }
        self.last_assigned = None;
        Applied {
            value: (),
            events: vec![DomainEvent::Reset],
        }
    }

    fn record_mut(
        &mut self,
        desk: DeskId,
        identity: &Identity,
    ) -> Result<&mut CustomerRecord, InvariantViolation> {
        self.registry
            .get_mut(identity)
            .ok_or_else(|| InvariantViolation::UnregisteredTicket {
                desk,
                identity: identity.clone(),
            })
    }

    /// Check the partition invariant and numbering.
    ///
    /// - every Waiting/InService ticket is placed exactly once, in a spot
    ///   matching its state;
    /// - completed tickets are placed nowhere;
    /// - ticket numbers are unique and not above the last issued number.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        if self.desks.is_empty() {
            return Err(InvariantViolation::NoDesks);
        }
        for pair in self.desks.windows(2) {
            if pair[0].id() >= pair[1].id() {
                return Err(InvariantViolation::DuplicateDesk(pair[1].id()));
            }
        }

        let mut placed = std::collections::BTreeSet::new();
        for desk in &self.desks {
            let slots = desk
                .in_service()
                .map(|identity| (identity, TicketState::InService))
                .into_iter()
                .chain(desk.waiting().map(|identity| (identity, TicketState::Waiting)));

            for (identity, expected) in slots {
                let record = self.registry.get(identity).ok_or_else(|| {
                    InvariantViolation::UnregisteredTicket {
                        desk: desk.id(),
                        identity: identity.clone(),
                    }
                })?;
                if record.state != expected {
                    return Err(InvariantViolation::StateMismatch {
                        identity: identity.clone(),
                        expected,
                        found: record.state,
                    });
                }
                if !placed.insert(identity) {
                    return Err(InvariantViolation::PlacedTwice(identity.clone()));
                }
            }
        }

        let last = self.registry.last_issued();
        let mut tickets = std::collections::BTreeSet::new();
        for record in self.registry.records() {
            if record.state.is_live() && !placed.contains(&record.identity) {
                return Err(InvariantViolation::Unplaced {
                    identity: record.identity.clone(),
                    state: record.state,
                });
            }
            if !tickets.insert(record.ticket) {
                return Err(InvariantViolation::DuplicateTicket(record.ticket));
            }
            if last.is_none_or(|last| record.ticket > last) {
                return Err(InvariantViolation::TicketAboveLastIssued {
                    ticket: record.ticket,
                    last,
                });
            }
        }
        Ok(())
    }
}
