//! Producer matching command.

use serde::Serialize;
use std::collections::BTreeSet;
use tokio::runtime::Runtime;

use crate::db;
use crate::model::Producer;
use crate::producers::{match_producers_from_filename, search_text};

use super::{CommandContext, print_json};

#[derive(Debug, Serialize)]
struct MatchedProducer<'a> {
    id: i64,
    name: &'a str,
}

/// Match a filename against the catalog's producers and aliases
pub fn cmd_match_producers(
    rt: &Runtime,
    ctx: &CommandContext,
    filename: &str,
    artist_ids: &[i64],
    song_id: Option<i64>,
) -> anyhow::Result<()> {
    let (producers, ids) = rt.block_on(async {
        let pool = ctx.pool().await?;

        let mut artists = artist_ids.to_vec();
        if let Some(song_id) = song_id {
            artists.extend(db::song_artist_ids(&pool, song_id).await?);
        }

        let ids = match_producers_from_filename(&pool, filename, &artists).await?;
        let producers = db::get_producers_with_aliases(&pool).await?;
        pool.close().await;
        anyhow::Ok((producers, ids))
    })?;

    let matched = named(&producers, &ids);

    if ctx.json {
        return print_json(&matched);
    }

    println!("Searching {:?}", search_text(filename));
    if matched.is_empty() {
        println!("No producers matched.");
    }
    for producer in matched {
        println!("  {:>5}  {}", producer.id, producer.name);
    }
    Ok(())
}

fn named<'a>(producers: &'a [Producer], ids: &BTreeSet<i64>) -> Vec<MatchedProducer<'a>> {
    producers
        .iter()
        .filter(|p| ids.contains(&p.id))
        .map(|p| MatchedProducer {
            id: p.id,
            name: &p.name,
        })
        .collect()
}
