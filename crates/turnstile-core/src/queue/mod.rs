//! Queue module: ticket registry, desk queues, desk selection and the owned
//! engine state that ties them together.

mod desk;
mod registry;
mod selector;
mod state;

pub use desk::DeskQueue;
pub use registry::TicketRegistry;
pub use selector::{DeskLoad, DeskSelector, Selection, TieBreak};
pub use state::{Applied, EngineState, InvariantViolation, Placement, Registration};
