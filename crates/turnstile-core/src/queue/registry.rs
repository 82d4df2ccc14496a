//! Ticket registry: issues numbers and owns every customer record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerRecord, Identity, QueueError, TicketNumber};

/// Customer records keyed by identity, plus the numbering high-water mark.
///
/// `last_issued` is the historical maximum. It is never lowered when a
/// ticket completes, so numbers are never reused until an explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRegistry {
    customers: BTreeMap<Identity, CustomerRecord>,
    last_issued: Option<TicketNumber>,
}

impl TicketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket to `identity`.
    ///
    /// Fails with `AlreadyRegistered` if the identity holds a ticket of any
    /// state, completed included.
    pub fn register(
        &mut self,
        identity: Identity,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<TicketNumber, QueueError> {
        if let Some(existing) = self.customers.get(&identity) {
            return Err(QueueError::AlreadyRegistered {
                identity,
                ticket: existing.ticket,
            });
        }

        let ticket = self.next_number();
        let record = CustomerRecord::new(identity.clone(), name, ticket, now);
        self.customers.insert(identity, record);
        self.last_issued = Some(ticket);
        Ok(ticket)
    }

    /// Number the next registration will receive.
    pub fn next_number(&self) -> TicketNumber {
        self.last_issued
            .map_or(TicketNumber::FIRST, TicketNumber::next)
    }

    pub fn last_issued(&self) -> Option<TicketNumber> {
        self.last_issued
    }

    pub fn lookup(&self, identity: &Identity) -> Result<&CustomerRecord, QueueError> {
        self.customers
            .get(identity)
            .ok_or_else(|| QueueError::NotFound(identity.clone()))
    }

    pub fn get(&self, identity: &Identity) -> Option<&CustomerRecord> {
        self.customers.get(identity)
    }

    pub fn get_mut(&mut self, identity: &Identity) -> Option<&mut CustomerRecord> {
        self.customers.get_mut(identity)
    }

    pub fn records(&self) -> impl Iterator<Item = &CustomerRecord> {
        self.customers.values()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Forget every record and restart numbering at 1.
    pub fn clear(&mut self) {
        self.customers.clear();
        self.last_issued = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TicketState;

    fn id(raw: &str) -> Identity {
        Identity::parse(raw).unwrap()
    }

    #[test]
    fn numbering_starts_at_one_and_increases() {
        let mut reg = TicketRegistry::new();
        let now = Utc::now();

        let t1 = reg.register(id("111111111111"), "An", now).unwrap();
        let t2 = reg.register(id("222222222222"), "Binh", now).unwrap();

        assert_eq!(t1, TicketNumber::new(1));
        assert_eq!(t2, TicketNumber::new(2));
        assert_eq!(reg.last_issued(), Some(t2));
        assert_eq!(reg.lookup(&id("222222222222")).unwrap().state, TicketState::Waiting);
    }

    #[test]
    fn second_registration_is_rejected_without_change() {
        let mut reg = TicketRegistry::new();
        let now = Utc::now();
        reg.register(id("111111111111"), "An", now).unwrap();

        let err = reg.register(id("111111111111"), "Other", now).unwrap_err();
        assert!(matches!(
            err,
            QueueError::AlreadyRegistered { ticket, .. } if ticket == TicketNumber::FIRST
        ));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.lookup(&id("111111111111")).unwrap().name, "An");
        assert_eq!(reg.next_number(), TicketNumber::new(2));
    }

    #[test]
    fn completed_tickets_do_not_free_their_number() {
        let mut reg = TicketRegistry::new();
        let now = Utc::now();
        let first = id("111111111111");
        reg.register(first.clone(), "An", now).unwrap();
        reg.get_mut(&first).unwrap().complete(now);

        let t2 = reg.register(id("222222222222"), "Binh", now).unwrap();
        assert_eq!(t2, TicketNumber::new(2));

        let again = reg.register(first, "An", now);
        assert!(matches!(again, Err(QueueError::AlreadyRegistered { .. })));
    }

    #[test]
    fn lookup_of_unknown_identity_is_not_found() {
        let reg = TicketRegistry::new();
        let err = reg.lookup(&id("999999999999")).unwrap_err();
        assert!(matches!(err, QueueError::NotFound(_)));
    }

    #[test]
    fn clear_restarts_numbering() {
        let mut reg = TicketRegistry::new();
        reg.register(id("111111111111"), "An", Utc::now()).unwrap();
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.next_number(), TicketNumber::FIRST);
    }
}
