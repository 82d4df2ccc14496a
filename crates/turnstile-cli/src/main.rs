use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use turnstile_core::app::{BuildError, EngineBuilder, EngineConfig};
use turnstile_core::domain::DeskId;
use turnstile_core::impls::JsonFileStateStore;
use turnstile_core::queue::TieBreak;
use turnstile_core::QueueEngine;

mod commands;
mod console_sink;
mod render;

use commands::Command;
use console_sink::ConsoleEventSink;

#[derive(Debug, Parser)]
#[command(name = "turnstile", about = "Ticket queue console for a walk-in service counter")]
struct Args {
    /// JSON file holding the queue state; kept in memory when omitted.
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Engine configuration as JSON (desks, tie_break).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Desk numbers, overriding the configuration file.
    #[arg(long, value_delimiter = ',')]
    desks: Option<Vec<u16>>,

    /// How to choose between equally busy desks.
    #[arg(long, value_enum)]
    tie_break: Option<TieBreakArg>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TieBreakArg {
    LowestIndex,
    RoundRobin,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::LowestIndex => TieBreak::LowestIndex,
            TieBreakArg::RoundRobin => TieBreak::RoundRobin,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("reading {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("reading input: {0}")]
    Input(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "turnstile stopped");
            ExitCode::FAILURE
        }
    }
}

async fn load_config(args: &Args) -> Result<EngineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::ConfigRead {
                    path: path.clone(),
                    source,
                })?;
            EngineConfig::from_json_str(&text).map_err(|source| CliError::ConfigParse {
                path: path.clone(),
                source,
            })?
        }
        None => EngineConfig::default(),
    };
    if let Some(desks) = &args.desks {
        config.desks = desks.iter().copied().map(DeskId::new).collect();
    }
    if let Some(tie_break) = args.tie_break {
        config.tie_break = tie_break.into();
    }
    Ok(config)
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args).await?;
    let mut builder = EngineBuilder::new()
        .config(config)
        .event_sink(Arc::new(ConsoleEventSink::new()));
    if let Some(path) = &args.state_file {
        info!(path = %path.display(), "using state file");
        builder = builder.store(Arc::new(JsonFileStateStore::new(path)));
    }
    let engine = builder.open().await?;

    println!("{}", commands::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match commands::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => println!("{}", execute(&engine, command).await),
            Ok(None) => {}
            Err(e) => println!("error: {e}"),
        }
    }
    Ok(())
}

async fn execute(engine: &QueueEngine, command: Command) -> String {
    let result = match command {
        Command::Register { identity, name } => engine
            .register_customer(&name, &identity)
            .await
            .map(|r| render::registration(&r)),
        Command::Call(desk) => engine.call_next(desk).await.map(|called| match called {
            Some(record) => format!("desk {desk}: now serving number {}", record.ticket),
            None => format!("desk {desk}: nobody waiting"),
        }),
        Command::Skip(desk) => engine
            .skip(desk)
            .await
            .map(|record| format!("desk {desk}: skipped, now serving number {}", record.ticket)),
        Command::Status(identity) => Ok(render::ticket_status(&engine.status_of(&identity).await)),
        Command::Lookup(identity) => engine.lookup(&identity).await.map(|r| render::record(&r)),
        Command::Desks => Ok(engine
            .all_desks()
            .await
            .iter()
            .map(render::desk)
            .collect::<Vec<_>>()
            .join("\n")),
        Command::Desk(desk) => engine.desk_status(desk).await.map(|d| render::desk(&d)),
        Command::Reset => engine.reset().await.map(|()| "all tickets cleared".to_string()),
        Command::Help => Ok(commands::HELP.to_string()),
        Command::Quit => Ok(String::new()),
    };
    match result {
        Ok(text) => text,
        Err(e) if e.is_retryable() => format!("error: {e} (try again)"),
        Err(e) => format!("error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run_script(engine: &QueueEngine, script: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for line in script {
            if let Ok(Some(command)) = commands::parse(line) {
                out.push(execute(engine, command).await);
            }
        }
        out
    }

    #[tokio::test]
    async fn console_session() {
        let engine = EngineBuilder::new().open().await.unwrap();
        let out = run_script(
            &engine,
            &[
                "register 111111111111 Nguyen Van An",
                "register 222222222222 Tran Binh",
                "register 111111111111 Again",
                "call 1",
                "skip 1",
                "status 222222222222",
                "call 2",
                "call 2",
                "status 222222222222",
            ],
        )
        .await;

        assert_eq!(out[0], "registered: ticket 1 at desk 1, position 1 in line");
        assert_eq!(out[1], "registered: ticket 2 at desk 2, position 1 in line");
        assert!(out[2].starts_with("error: identity 111111111111 is already registered"));
        assert_eq!(out[3], "desk 1: now serving number 1");
        assert_eq!(out[4], "desk 1: skipped, now serving number 1");
        assert_eq!(out[5], "waiting at desk 2, position 1");
        assert_eq!(out[6], "desk 2: now serving number 2");
        assert_eq!(out[7], "desk 2: nobody waiting");
        assert_eq!(out[8], "already served or not registered");
    }

    #[tokio::test]
    async fn skip_on_idle_desk_is_an_error_line() {
        let engine = EngineBuilder::new().open().await.unwrap();
        let out = run_script(&engine, &["skip 2", "call 9"]).await;
        assert_eq!(out[0], "error: desk 2 has no ticket in service");
        assert_eq!(out[1], "error: desk 9 does not exist");
    }

    #[test]
    fn tie_break_flag_maps_to_policy() {
        let args = Args::parse_from(["turnstile", "--desks", "1,2,3", "--tie-break", "round-robin"]);
        assert_eq!(args.desks, Some(vec![1, 2, 3]));
        assert_eq!(TieBreak::from(args.tie_break.unwrap()), TieBreak::RoundRobin);
    }

    #[tokio::test]
    async fn flags_override_defaults() {
        let args = Args::parse_from(["turnstile", "--desks", "4,5"]);
        let config = load_config(&args).await.unwrap();
        assert_eq!(config.desks, vec![DeskId::new(4), DeskId::new(5)]);
        assert_eq!(config.tie_break, TieBreak::LowestIndex);
    }
}
