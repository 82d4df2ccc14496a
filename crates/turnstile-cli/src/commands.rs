//! Operator console commands, one per input line.

use turnstile_core::domain::{DeskId, Identity, QueueError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `register <identity> <name...>`; the identity is validated by the engine.
    Register { identity: String, name: String },
    Call(DeskId),
    Skip(DeskId),
    Status(Identity),
    Lookup(Identity),
    Desks,
    Desk(DeskId),
    Reset,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0:?} is not a desk number")]
    BadDesk(String),

    #[error("{0}")]
    BadIdentity(String),
}

pub const HELP: &str = "\
commands:
  register <identity> <name>   issue a ticket
  call <desk>                  call the next customer to a desk
  skip <desk>                  send the current customer to the back and call the next
  status <identity>            where is this ticket
  lookup <identity>            full customer record
  desks                        show every desk
  desk <desk>                  show one desk
  reset                        drop every ticket and restart numbering
  help | quit";

/// `Ok(None)` for blank lines and `#` comments.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "register" | "reg" => {
            let Some((identity, name)) = rest.split_once(char::is_whitespace) else {
                return Err(ParseError::Usage("register <identity> <name>"));
            };
            Command::Register {
                identity: identity.to_string(),
                name: name.trim().to_string(),
            }
        }
        "call" | "next" => Command::Call(desk_arg(rest, "call <desk>")?),
        "skip" => Command::Skip(desk_arg(rest, "skip <desk>")?),
        "status" => Command::Status(identity_arg(rest, "status <identity>")?),
        "lookup" => Command::Lookup(identity_arg(rest, "lookup <identity>")?),
        "desks" => Command::Desks,
        "desk" => Command::Desk(desk_arg(rest, "desk <desk>")?),
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn desk_arg(rest: &str, usage: &'static str) -> Result<DeskId, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    rest.parse()
        .map_err(|_| ParseError::BadDesk(rest.to_string()))
}

fn identity_arg(rest: &str, usage: &'static str) -> Result<Identity, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Identity::parse(rest).map_err(|e: QueueError| ParseError::BadIdentity(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_keeps_spaces_in_name() {
        let cmd = parse("register 111111111111 Nguyen Van An").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Register {
                identity: "111111111111".into(),
                name: "Nguyen Van An".into(),
            })
        );
    }

    #[test]
    fn register_needs_a_name() {
        assert_eq!(
            parse("register 111111111111"),
            Err(ParseError::Usage("register <identity> <name>"))
        );
    }

    #[test]
    fn desk_commands() {
        assert_eq!(parse("call 1").unwrap(), Some(Command::Call(DeskId::new(1))));
        assert_eq!(parse("SKIP 2").unwrap(), Some(Command::Skip(DeskId::new(2))));
        assert_eq!(parse("desk 2").unwrap(), Some(Command::Desk(DeskId::new(2))));
        assert_eq!(parse("call one"), Err(ParseError::BadDesk("one".into())));
        assert_eq!(parse("call"), Err(ParseError::Usage("call <desk>")));
    }

    #[test]
    fn identity_commands_validate() {
        assert!(matches!(parse("status 111111111111"), Ok(Some(Command::Status(_)))));
        assert!(matches!(parse("lookup 12"), Err(ParseError::BadIdentity(_))));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("# morning shift"), Ok(None));
    }

    #[test]
    fn unknown_word_is_reported() {
        assert_eq!(parse("dance"), Err(ParseError::Unknown("dance".into())));
    }
}
