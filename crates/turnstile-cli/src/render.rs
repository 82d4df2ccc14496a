//! Text rendering of engine results.

use std::fmt::Write;

use turnstile_core::app::{DeskStatus, TicketStatus};
use turnstile_core::domain::{CustomerRecord, TicketState};
use turnstile_core::queue::Registration;

pub fn registration(r: &Registration) -> String {
    format!(
        "registered: ticket {} at desk {}, position {} in line",
        r.ticket, r.desk, r.position
    )
}

pub fn ticket_status(status: &TicketStatus) -> String {
    match status {
        TicketStatus::InService { desk } => format!("being served at desk {desk}"),
        TicketStatus::Waiting { desk, position } => {
            format!("waiting at desk {desk}, position {position}")
        }
        TicketStatus::Unknown => "already served or not registered".to_string(),
    }
}

pub fn record(r: &CustomerRecord) -> String {
    let state = match r.state {
        TicketState::Waiting => "waiting",
        TicketState::InService => "in service",
        TicketState::Completed => "completed",
    };
    format!(
        "{} ({}) ticket {} - {} - issued {}",
        r.name,
        r.identity,
        r.ticket,
        state,
        r.issued_at.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn desk(status: &DeskStatus) -> String {
    let mut out = format!("desk {}\n  serving: ", status.desk);
    match &status.in_service {
        Some(r) => {
            let _ = writeln!(out, "{} - number {}", r.name, r.ticket);
        }
        None => out.push_str("nobody\n"),
    }
    if status.waiting.is_empty() {
        out.push_str("  waiting: nobody");
    } else {
        out.push_str("  waiting:");
        for (index, r) in status.waiting.iter().enumerate() {
            let _ = write!(out, "\n    {}. {} - number {}", index + 1, r.name, r.ticket);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use turnstile_core::domain::{DeskId, Identity, TicketNumber};

    fn customer(name: &str, n: u64) -> CustomerRecord {
        CustomerRecord::new(
            Identity::parse(&format!("{n:012}")).unwrap(),
            name,
            TicketNumber::new(n),
            Utc::now(),
        )
    }

    #[test]
    fn desk_lists_waiting_line_with_positions() {
        let status = DeskStatus {
            desk: DeskId::new(1),
            in_service: Some(customer("An", 1)),
            waiting: vec![customer("Binh", 2), customer("Chi", 3)],
        };
        assert_eq!(
            desk(&status),
            "desk 1\n  serving: An - number 1\n  waiting:\n    1. Binh - number 2\n    2. Chi - number 3"
        );
    }

    #[test]
    fn idle_desk() {
        let status = DeskStatus {
            desk: DeskId::new(2),
            in_service: None,
            waiting: vec![],
        };
        assert_eq!(desk(&status), "desk 2\n  serving: nobody\n  waiting: nobody");
    }

    #[test]
    fn status_lines() {
        let waiting = TicketStatus::Waiting { desk: DeskId::new(2), position: 3 };
        assert_eq!(ticket_status(&waiting), "waiting at desk 2, position 3");
        assert_eq!(ticket_status(&TicketStatus::Unknown), "already served or not registered");
    }
}
