//! Desk queue: one FIFO of waiting tickets plus the in-service slot.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::{DeskId, Identity};

/// Waiting line and in-service slot of a single desk.
///
/// Holds identities only. Positions are derived from the current order on
/// every query; nothing stores a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskQueue {
    id: DeskId,
    in_service: Option<Identity>,
    waiting: VecDeque<Identity>,
}

impl DeskQueue {
    pub fn new(id: DeskId) -> Self {
        Self {
            id,
            in_service: None,
            waiting: VecDeque::new(),
        }
    }

    pub fn id(&self) -> DeskId {
        self.id
    }

    /// Append at the tail; returns the 1-based position of the new entry.
    ///
    /// Used for normal arrivals and for skip-to-back alike.
    pub fn enqueue(&mut self, identity: Identity) -> usize {
        self.waiting.push_back(identity);
        self.waiting.len()
    }

    pub fn dequeue_head(&mut self) -> Option<Identity> {
        self.waiting.pop_front()
    }

    /// Replace the in-service slot; returns whatever was there before.
    ///
    /// The previous occupant is not re-queued. The caller decides whether
    /// it completed or goes back in line.
    pub fn set_in_service(&mut self, identity: Option<Identity>) -> Option<Identity> {
        std::mem::replace(&mut self.in_service, identity)
    }

    pub fn take_in_service(&mut self) -> Option<Identity> {
        self.in_service.take()
    }

    pub fn in_service(&self) -> Option<&Identity> {
        self.in_service.as_ref()
    }

    /// 1-based index in the current waiting order.
    pub fn position_of(&self, identity: &Identity) -> Option<usize> {
        self.waiting
            .iter()
            .position(|queued| queued == identity)
            .map(|index| index + 1)
    }

    pub fn waiting(&self) -> impl ExactSizeIterator<Item = &Identity> {
        self.waiting.iter()
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_service.is_none() && self.waiting.is_empty()
    }

    pub fn clear(&mut self) {
        self.in_service = None;
        self.waiting.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> Identity {
        Identity::parse(raw).unwrap()
    }

    #[test]
    fn fifo_order_and_positions() {
        let mut desk = DeskQueue::new(DeskId::new(1));
        assert_eq!(desk.enqueue(id("111111111111")), 1);
        assert_eq!(desk.enqueue(id("222222222222")), 2);
        assert_eq!(desk.enqueue(id("333333333333")), 3);

        assert_eq!(desk.position_of(&id("222222222222")), Some(2));
        assert_eq!(desk.dequeue_head(), Some(id("111111111111")));
        assert_eq!(desk.position_of(&id("222222222222")), Some(1));
        assert_eq!(desk.position_of(&id("111111111111")), None);
    }

    #[test]
    fn set_in_service_returns_previous_without_requeue() {
        let mut desk = DeskQueue::new(DeskId::new(1));
        assert_eq!(desk.set_in_service(Some(id("111111111111"))), None);

        let previous = desk.set_in_service(Some(id("222222222222")));
        assert_eq!(previous, Some(id("111111111111")));
        assert_eq!(desk.waiting_len(), 0);
        assert_eq!(desk.in_service(), Some(&id("222222222222")));
    }

    #[test]
    fn empty_desk_is_idle() {
        let mut desk = DeskQueue::new(DeskId::new(2));
        assert!(desk.is_idle());
        assert_eq!(desk.dequeue_head(), None);

        desk.enqueue(id("111111111111"));
        assert!(!desk.is_idle());
        desk.clear();
        assert!(desk.is_idle());
    }
}
