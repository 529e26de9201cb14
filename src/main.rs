//! Catalog Tagger - embeds catalog metadata into audio files.
//!
//! Reads song, album, artist and producer records from the SQLite catalog,
//! resolves the canonical tag values for each song, and rewrites the tags of
//! MP3, FLAC, MP4/M4A and Ogg Vorbis files in place.

pub mod batch;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
pub mod producers;
pub mod tags;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("catalog_tagger=info".parse()?))
        .init();

    cli::run_command(&args)
}
