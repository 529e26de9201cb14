//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `write`: tag writes for a song, album, producer or artist, and dry-run resolution
//! - `producers`: filename producer matching against the catalog
//! - `tools`: file inspection, remux tool check, configuration

mod producers;
mod tools;
mod write;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::batch::BatchCoordinator;
use crate::config::{self, Config};
use crate::db;
use crate::library::LibraryRoot;
use crate::tags::TagWriter;

pub use producers::cmd_match_producers;
pub use tools::{cmd_check_tools, cmd_config, cmd_inspect};
pub use write::{WriteScope, cmd_resolve, cmd_write_batch, cmd_write_song};

/// Catalog tagger CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Catalog database (overrides the config file)
    #[arg(long, global = true, env = "CATALOG_TAGGER_DB")]
    pub db: Option<PathBuf>,

    /// Library root for song and artwork paths (overrides the config file)
    #[arg(long, global = true, env = "CATALOG_TAGGER_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Write catalog tags into one song's file
    WriteSong {
        /// Song ID
        id: i64,
    },
    /// Write tags for every song on an album
    WriteAlbum {
        /// Album ID
        id: i64,
    },
    /// Write tags for every song credited to a producer
    WriteProducer {
        /// Producer ID
        id: i64,
    },
    /// Write tags for every song linked to an artist
    WriteArtist {
        /// Artist ID
        id: i64,
    },
    /// Show the tags a write would embed, without touching the file
    Resolve {
        /// Song ID
        id: i64,
    },
    /// Match a filename against the catalog's producers and aliases
    MatchProducers {
        /// Filename to search (the extension is ignored)
        filename: String,
        /// Artist ID of the song (repeatable)
        #[arg(short, long = "artist")]
        artists: Vec<i64>,
        /// Use the linked artists of this song
        #[arg(long)]
        song: Option<i64>,
    },
    /// Read the tags embedded in an audio file
    Inspect {
        /// Path to the audio file
        path: PathBuf,
    },
    /// Check if the MP4 remux tool is installed
    CheckTools,
    /// Show the effective configuration
    Config {
        /// Save it to the config file
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let ctx = CommandContext::new(cli);

    match &cli.command {
        Commands::WriteSong { id } => cmd_write_song(&rt, &ctx, *id),
        Commands::WriteAlbum { id } => cmd_write_batch(&rt, &ctx, WriteScope::Album(*id)),
        Commands::WriteProducer { id } => cmd_write_batch(&rt, &ctx, WriteScope::Producer(*id)),
        Commands::WriteArtist { id } => cmd_write_batch(&rt, &ctx, WriteScope::Artist(*id)),
        Commands::Resolve { id } => cmd_resolve(&rt, &ctx, *id),
        Commands::MatchProducers {
            filename,
            artists,
            song,
        } => cmd_match_producers(&rt, &ctx, filename, artists, *song),
        Commands::Inspect { path } => cmd_inspect(&ctx, path),
        Commands::CheckTools => cmd_check_tools(&ctx),
        Commands::Config { init } => cmd_config(&ctx, *init),
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Effective configuration and output mode for one invocation.
pub struct CommandContext {
    pub config: Config,
    pub json: bool,
}

impl CommandContext {
    fn new(cli: &Cli) -> Self {
        Self::with_config(config::load(), cli)
    }

    /// Apply the command-line overrides on top of `config`.
    fn with_config(mut config: Config, cli: &Cli) -> Self {
        if let Some(root) = &cli.root {
            config.library.root = root.clone();
        }
        if let Some(db) = &cli.db {
            config.library.database = Some(db.clone());
        }
        Self {
            config,
            json: cli.json,
        }
    }

    /// Open (and migrate) the catalog database.
    pub async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let path = self.config.library.database_path();
        db::init_db(&db::db_url(&path))
            .await
            .with_context(|| format!("opening catalog {:?}", path))
    }

    pub fn tag_writer(&self) -> TagWriter {
        TagWriter::new(
            LibraryRoot::new(&self.config.library.root),
            &self.config.writer.remux_tool,
        )
    }

    pub fn coordinator(&self, pool: SqlitePool) -> BatchCoordinator {
        BatchCoordinator::new(pool, self.tag_writer())
            .with_max_concurrent_writes(self.config.writer.max_concurrent_writes)
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
