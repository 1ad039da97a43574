//! `drill` command-line front end.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use drill_core::model::{SessionKey, WordlistId};
use services::{AppServices, AppServicesError, Clock, PracticeServiceError, WordlistServiceError};
use thiserror::Error;

mod commands;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error(transparent)]
    Input(#[from] drill_core::Error),
    #[error(transparent)]
    Startup(#[from] AppServicesError),
    #[error(transparent)]
    Practice(#[from] PracticeServiceError),
    #[error(transparent)]
    Wordlists(#[from] WordlistServiceError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "drill", version, about = "Vocabulary wordlist drills")]
struct Cli {
    /// SQLite database URL or file path
    #[arg(long, global = true, env = "DRILL_DB_URL", default_value = "sqlite://drill.sqlite3")]
    db: String,

    /// Key the practice session is stored under
    #[arg(long, global = true, env = "DRILL_SESSION_KEY", default_value = "local")]
    session_key: SessionKey,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List wordlists
    Lists {
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Create a wordlist from `prompt=answer` pairs
    Create {
        #[arg(long)]
        name: String,

        /// Word pair as `prompt=answer` (repeatable)
        #[arg(long = "pair", required = true)]
        pairs: Vec<String>,
    },

    /// Show a wordlist and its words
    Show { wordlist: WordlistId },

    /// Replace a wordlist's words with parallel --id/--side-a/--side-b rows
    Edit {
        wordlist: WordlistId,

        /// New name (keeps the current one if omitted)
        #[arg(long)]
        name: Option<String>,

        /// Existing word ID, or `new`
        #[arg(long = "id")]
        ids: Vec<String>,

        #[arg(long = "side-a")]
        side_a: Vec<String>,

        #[arg(long = "side-b")]
        side_b: Vec<String>,
    },

    /// Delete a wordlist and its words
    Delete { wordlist: WordlistId },

    /// Practice a wordlist interactively, resuming a saved session
    Practice {
        wordlist: WordlistId,

        /// Discard any saved session and start over
        #[arg(long)]
        restart: bool,

        /// Shuffle words when a session starts
        #[arg(long)]
        shuffle: bool,
    },

    /// Show the saved session's phase and progress
    Status,

    /// Drop the saved session
    Abandon,

    /// Create a small sample wordlist
    Seed,
}

impl Command {
    fn shuffles(&self) -> bool {
        matches!(self, Self::Practice { shuffle: true, .. })
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), CliError> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let invalid = || CliError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if cli.db.trim().is_empty() {
        return Err(CliError::InvalidDbUrl { raw: cli.db });
    }
    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;
    tracing::debug!(%db_url, "opening database");

    let app = AppServices::new_sqlite(&db_url, Clock::default(), cli.command.shuffles()).await?;
    let mut stdout = std::io::stdout().lock();
    commands::execute(&app, &cli.session_key, cli.command, &mut stdout).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("app=info,services=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(2);
    }
}
