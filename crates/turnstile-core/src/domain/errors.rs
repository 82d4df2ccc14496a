//! Errors - エラー型と分類
//!
//! Every engine operation reports failure as a typed [`QueueError`]; none of
//! them is fatal to the process. The presentation layer decides how to show
//! them.

use thiserror::Error;

use super::ids::{DeskId, Identity, TicketNumber};
use crate::ports::StoreError;
use crate::queue::InvariantViolation;

/// ErrorKind は実行エラーの分類
///
/// - Rejected: the request was refused before any state changed. Retrying
///   the same request gives the same answer.
/// - Transient: the durable store failed and the mutation was rolled back.
///   The same request may succeed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Rejected,
    Transient,
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("invalid identity {0:?}: expected exactly 12 ASCII digits")]
    InvalidIdentity(String),

    #[error("customer name must not be empty")]
    MissingName,

    #[error("identity {identity} is already registered with ticket {ticket}")]
    AlreadyRegistered {
        identity: Identity,
        ticket: TicketNumber,
    },

    #[error("desk {0} has no ticket in service")]
    NothingInService(DeskId),

    #[error("desk {0} does not exist")]
    UnknownDesk(DeskId),

    #[error("no customer registered with identity {0}")]
    NotFound(Identity),

    #[error("state store failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("queue state is inconsistent: {0}")]
    Inconsistent(#[from] InvariantViolation),
}

impl QueueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueueError::Persistence(_) => ErrorKind::Transient,
            _ => ErrorKind::Rejected,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_failures_are_retryable() {
        let err = QueueError::from(StoreError::Unavailable("disk full".into()));
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(err.is_retryable());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn validation_failures_are_rejections() {
        let err = QueueError::InvalidIdentity("abc".into());
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert!(!err.is_retryable());

        let err = QueueError::NothingInService(DeskId::new(2));
        assert_eq!(err.to_string(), "desk 2 has no ticket in service");
    }
}
