//! Tag writing commands.

use tokio::runtime::Runtime;

use crate::batch::{BatchResult, SongProcessingResult};
use crate::tags::{ResolvedTags, resolve};

use super::{CommandContext, print_json};

/// What a batch write covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteScope {
    Album(i64),
    Producer(i64),
    Artist(i64),
}

/// Write one song's tags
pub fn cmd_write_song(rt: &Runtime, ctx: &CommandContext, song_id: i64) -> anyhow::Result<()> {
    let result = rt.block_on(async {
        let pool = ctx.pool().await?;
        let result = ctx.coordinator(pool.clone()).write_song(song_id).await;
        pool.close().await;
        anyhow::Ok(result)
    })?;

    if ctx.json {
        print_json(&result)?;
    } else {
        print_song_result(&result);
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Write tags for every song in an album, producer or artist
pub fn cmd_write_batch(rt: &Runtime, ctx: &CommandContext, scope: WriteScope) -> anyhow::Result<()> {
    let batch = rt.block_on(async {
        let pool = ctx.pool().await?;
        let coordinator = ctx.coordinator(pool.clone());
        let batch = match scope {
            WriteScope::Album(id) => coordinator.write_album(id).await,
            WriteScope::Producer(id) => coordinator.write_producer(id).await,
            WriteScope::Artist(id) => coordinator.write_artist(id).await,
        };
        pool.close().await;
        anyhow::Ok(batch?)
    })?;

    if ctx.json {
        return print_json(&batch);
    }
    print_batch(&batch);
    Ok(())
}

/// Print the tags a write would embed
pub fn cmd_resolve(rt: &Runtime, ctx: &CommandContext, song_id: i64) -> anyhow::Result<()> {
    let tags = rt.block_on(async {
        let pool = ctx.pool().await?;
        let tags = resolve(&pool, song_id).await;
        pool.close().await;
        anyhow::Ok(tags?)
    })?;

    if ctx.json {
        return print_json(&tags);
    }
    print_tags(&tags);
    Ok(())
}

fn print_song_result(result: &SongProcessingResult) {
    match &result.error {
        None => println!("✓ Song {}: tags written", result.song_id),
        Some(error) => println!("✗ Song {}: {}", result.song_id, error),
    }
}

fn print_batch(batch: &BatchResult) {
    println!("{}", batch.message);
    println!("  Written: {}", batch.processed_count);
    println!("  Failed:  {}", batch.failed_count);

    let failures: Vec<_> = batch.results.iter().filter(|r| !r.success).collect();
    if !failures.is_empty() {
        println!();
        for result in failures {
            print_song_result(result);
        }
    }
}

fn print_tags(tags: &ResolvedTags) {
    let rows = [
        ("Title", tags.title.as_str()),
        ("Artist", tags.artist.as_str()),
        ("Album artist", tags.album_artist.as_str()),
        ("Album", tags.album.as_str()),
        ("Genre", tags.genre.as_str()),
        ("Track", tags.track_position.as_str()),
        ("Producers", tags.producers.as_str()),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            println!("  {:<13} {}", format!("{label}:"), value);
        }
    }
    if tags.year > 0 {
        println!("  {:<13} {}", "Year:", tags.year);
    }
    if let Some(artwork) = &tags.artwork_path {
        println!("  {:<13} {}", "Artwork:", artwork);
    }
}
