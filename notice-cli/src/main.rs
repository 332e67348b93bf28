//! # notice-cli
//!
//! CLI harness for the noticeboard query controller.
//!
//! Loads notices from a JSON fixture into an in-memory store and drives a
//! notice list session from the command line.
//!
//! ## Commands
//!
//! - `search`: Fetch the first page for a filter, optionally following pages
//! - `interactive`: Read search input and paging commands from stdin
//!
//! ## Example
//!
//! ```bash
//! # List notices whose title starts with "Road"
//! notice-cli --fixture demos/notices.json search Road
//!
//! # First three pages of everything, five per page
//! notice-cli --config demos/noticeboard.toml search "" --pages 3
//!
//! # Type searches line by line; :next, :prev, :retry, :first, :quit
//! notice-cli interactive
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use notice_client::{FetchOrchestrator, MemoryStore, QueryConfig};
use notice_types::StoreError;

mod commands;
mod fixture;
mod render;

use commands::{interactive, search};

const DEFAULT_LOG_FILTER: &str = "notice_cli=info,noticeboard_client=info";

/// CLI harness for the noticeboard query controller.
#[derive(Parser, Debug)]
#[command(name = "notice-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON file with the notices to serve
    #[arg(long, global = true, default_value = "demos/notices.json")]
    fixture: PathBuf,

    /// TOML session configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fail the first query with a permission error (to see the error view)
    #[arg(long, global = true)]
    deny_first: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the first page for a filter
    Search {
        /// Title prefix to search for (empty lists everything)
        #[arg(default_value = "")]
        filter: String,

        /// Number of pages to follow
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Read search input and paging commands from stdin
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => QueryConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => QueryConfig::default(),
    };

    let notices = fixture::load(&cli.fixture).await?;
    tracing::info!(count = notices.len(), fixture = %cli.fixture.display(), "fixture loaded");

    let store = MemoryStore::with_notices(&config.collection, notices);
    if cli.deny_first {
        store.fail_next(StoreError::PermissionDenied(
            "Missing or insufficient permissions.".into(),
        ));
    }
    let orchestrator =
        FetchOrchestrator::new(store, &config).context("Failed to start notice list session")?;

    match cli.command {
        Commands::Search { filter, pages } => {
            search::run(&orchestrator, &filter, pages).await?;
        }
        Commands::Interactive => {
            interactive::run(&orchestrator, config.quiet_period()).await?;
        }
    }

    Ok(())
}
