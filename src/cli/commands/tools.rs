//! Inspection, tool and configuration commands.

use std::path::Path;

use crate::config;
use crate::metadata::{self, EmbeddedTags};
use crate::tags::writer::remux_tool_version;

use super::{CommandContext, print_json};

/// Read the tags embedded in an audio file
pub fn cmd_inspect(ctx: &CommandContext, path: &Path) -> anyhow::Result<()> {
    let tags = metadata::inspect(path)?;

    if ctx.json {
        return print_json(&tags);
    }

    println!("{}", path.display());
    print_embedded(&tags);
    Ok(())
}

fn print_embedded(tags: &EmbeddedTags) {
    let text = [
        ("Title", &tags.title),
        ("Artist", &tags.artist),
        ("Album artist", &tags.album_artist),
        ("Album", &tags.album),
        ("Genre", &tags.genre),
        ("Producers", &tags.producers),
    ];
    for (label, value) in text {
        println!(
            "  {:<13} {}",
            format!("{label}:"),
            value.as_deref().unwrap_or("-")
        );
    }

    let year = tags.year.map(|y| y.to_string());
    println!("  {:<13} {}", "Year:", year.as_deref().unwrap_or("-"));

    let track = match (tags.track_number, tags.track_total) {
        (Some(n), Some(t)) => format!("{n}/{t}"),
        (Some(n), None) => n.to_string(),
        _ => "-".to_string(),
    };
    println!("  {:<13} {}", "Track:", track);

    match &tags.cover_mime {
        Some(mime) => println!("  {:<13} {} ({} pictures)", "Cover:", mime, tags.picture_count),
        None => println!("  {:<13} none ({} pictures)", "Cover:", tags.picture_count),
    }
}

/// Check if the MP4 remux tool is installed
pub fn cmd_check_tools(ctx: &CommandContext) -> anyhow::Result<()> {
    let writer = ctx.tag_writer();
    let tool = writer.remux_tool();
    let root = writer.root().path();
    let version = remux_tool_version(tool);

    if ctx.json {
        return print_json(&serde_json::json!({
            "remuxTool": tool,
            "available": version.is_some(),
            "version": version,
            "libraryRoot": root,
            "libraryRootExists": root.is_dir(),
        }));
    }

    println!("Checking tag writing tools...\n");
    if root.is_dir() {
        println!("✓ library root: {}", root.display());
    } else {
        println!("✗ library root: {} (not a directory)", root.display());
    }
    match version {
        Some(version) => println!("✓ {}: {}", tool, version),
        None => {
            println!("✗ {}: NOT FOUND (MP4/M4A writes will fail)", tool);
            println!("Install ffmpeg:");
            println!("  Windows: winget install Gyan.FFmpeg");
            println!("  macOS:   brew install ffmpeg");
            println!("  Linux:   apt install ffmpeg");
            println!("Or point writer.remux_tool at an existing binary.");
        }
    }
    Ok(())
}

/// Show the effective configuration, optionally saving it
pub fn cmd_config(ctx: &CommandContext, init: bool) -> anyhow::Result<()> {
    if init {
        config::save(&ctx.config)?;
        if let Some(path) = config::config_path() {
            eprintln!("Saved {}", path.display());
        }
    }

    if ctx.json {
        return print_json(&ctx.config);
    }
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}
