//! Command-line interface for catalog-tagger.
//!
//! This module provides CLI commands for writing catalog tags into audio
//! files, previewing resolved tags, and checking the external tooling.

mod commands;

pub use commands::{Cli, Commands, run_command};
