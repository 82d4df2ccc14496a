//! Domain identifiers (strongly-typed IDs).
//!
//! Three keys flow through the engine and must never be confused:
//! - [`Identity`]: the customer's external identifier (12 ASCII digits).
//!   This is the comparison key for "is this the same ticket" everywhere.
//! - [`TicketNumber`]: the issued number, strictly increasing, never reused.
//! - [`DeskId`]: one of the fixed service desks.
//!
//! Each is a newtype so that a desk index cannot be passed where a ticket
//! number is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::QueueError;

/// Number of ASCII digits in a valid identity.
pub const IDENTITY_LEN: usize = 12;

/// A validated customer identity.
///
/// Construction goes through [`Identity::parse`], and deserialization runs
/// the same check, so a persisted state file cannot smuggle in a malformed
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Validate and wrap a raw identity string.
    ///
    /// The input is taken verbatim: no trimming, no normalisation.
    pub fn parse(raw: &str) -> Result<Self, QueueError> {
        let well_formed =
            raw.len() == IDENTITY_LEN && raw.bytes().all(|b| b.is_ascii_digit());
        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(QueueError::InvalidIdentity(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identity {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issued ticket number. The first ticket is 1.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(u64);

impl TicketNumber {
    pub const FIRST: TicketNumber = TicketNumber(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The number issued after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a service desk.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeskId(u16);

impl DeskId {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DeskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u16>().map(DeskId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn twelve_digits_is_valid() {
        let id = Identity::parse("012345678901").unwrap();
        assert_eq!(id.as_str(), "012345678901");
        assert_eq!(id.to_string(), "012345678901");
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("12345678901")]
    #[case::too_long("1234567890123")]
    #[case::letter("12345678901a")]
    #[case::padded(" 12345678901")]
    #[case::unicode_digit("12345678901٣")]
    fn malformed_identity_is_rejected(#[case] raw: &str) {
        let err = Identity::parse(raw).unwrap_err();
        assert!(matches!(err, QueueError::InvalidIdentity(s) if s == raw));
    }

    #[test]
    fn identity_deserialization_validates() {
        let ok: Identity = serde_json::from_str("\"111111111111\"").unwrap();
        assert_eq!(ok.as_str(), "111111111111");

        let bad = serde_json::from_str::<Identity>("\"abc\"");
        assert!(bad.is_err());
    }

    #[test]
    fn ticket_numbers_advance_by_one() {
        let first = TicketNumber::FIRST;
        assert_eq!(first.get(), 1);
        assert_eq!(first.next(), TicketNumber::new(2));
        assert!(first < first.next());
    }

    #[test]
    fn desk_id_parses_from_text() {
        assert_eq!("2".parse::<DeskId>().unwrap(), DeskId::new(2));
        assert!("two".parse::<DeskId>().is_err());
    }
}
