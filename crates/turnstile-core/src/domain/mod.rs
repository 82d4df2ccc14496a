//! Domain model (IDs, customer records, lifecycle, events, errors).
//!
//! Architecture-agnostic: nothing here knows about locks, stores or sinks.

pub mod customer;
pub mod errors;
pub mod events;
pub mod ids;
pub mod state;

pub use self::customer::CustomerRecord;
pub use self::errors::{ErrorKind, QueueError};
pub use self::events::DomainEvent;
pub use self::ids::{DeskId, IDENTITY_LEN, Identity, TicketNumber};
pub use self::state::TicketState;
