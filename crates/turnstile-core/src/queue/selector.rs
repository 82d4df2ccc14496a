//! Desk selection policy: decides which desk a new ticket joins.

use serde::{Deserialize, Serialize};

use crate::domain::DeskId;

/// How to choose among desks that share the shortest waiting line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The lowest desk index wins.
    #[default]
    LowestIndex,

    /// Rotate: the first tied desk after the desk that received the
    /// previous ticket wins, wrapping around to the lowest index.
    RoundRobin,
}

/// Waiting-line length of one desk at decision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeskLoad {
    pub desk: DeskId,
    pub waiting: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub desk: DeskId,

    /// More than one desk had the shortest line.
    pub tie_broken: bool,
}

/// Least-busy desk selector.
///
/// The choice depends only on waiting-line lengths (in-service tickets do
/// not count) and, for `RoundRobin`, on the desk that got the previous
/// ticket.
/// Nothing about the arriving ticket is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeskSelector {
    pub tie_break: TieBreak,
}

impl DeskSelector {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Pick a desk.
    ///
    /// # Arguments
    /// * `loads` - One entry per desk, in ascending desk order.
    /// * `last_assigned` - Desk that received the previous ticket. Only
    ///   `RoundRobin` consults it.
    ///
    /// Returns `None` only when `loads` is empty.
    pub fn select(&self, loads: &[DeskLoad], last_assigned: Option<DeskId>) -> Option<Selection> {
        let shortest = loads.iter().map(|load| load.waiting).min()?;
        let tied: Vec<DeskId> = loads
            .iter()
            .filter(|load| load.waiting == shortest)
            .map(|load| load.desk)
            .collect();

        let first = *tied.first()?;
        if tied.len() == 1 {
            return Some(Selection {
                desk: first,
                tie_broken: false,
            });
        }

        let desk = match (self.tie_break, last_assigned) {
            (TieBreak::RoundRobin, Some(last)) => tied
                .iter()
                .copied()
                .find(|desk| *desk > last)
                .unwrap_or(first),
            _ => first,
        };
        Some(Selection {
            desk,
            tie_broken: true,
        })
    }
}
