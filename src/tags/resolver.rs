//! Tag value resolution.
//!
//! Turns one catalog row into [`ResolvedTags`]:
//! - genre falls back to the album genre
//! - album artist falls back to the song artists
//! - artwork falls back to the album artwork
//! - album-less songs become singles ("<title> - Single", 1/1) when the
//!   setting is on, and lose their track number when it is off
//! - album tracks are numbered against the live album song count

use sqlx::SqlitePool;
use tracing::debug;

use super::ResolvedTags;
use crate::db;
use crate::error::{Error, Result};
use crate::model::{Settings, SongTagRow};

/// A song's file location together with its resolved tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSong {
    pub song_id: i64,
    /// Catalog-relative path of the audio file
    pub filepath: String,
    pub tags: ResolvedTags,
}

/// Resolve the tags for a song.
pub async fn resolve(pool: &SqlitePool, song_id: i64) -> Result<ResolvedTags> {
    resolve_song(pool, song_id).await.map(|song| song.tags)
}

/// Resolve the tags for a song and report where its file lives.
///
/// # Errors
///
/// [`Error::SongNotFound`] when there is no such song; database errors as-is.
pub async fn resolve_song(pool: &SqlitePool, song_id: i64) -> Result<ResolvedSong> {
    let row = db::get_song_tag_row(pool, song_id)
        .await?
        .ok_or(Error::SongNotFound(song_id))?;

    let settings = db::get_settings(pool).await?;

    let album_song_count = match row.album_id {
        Some(album_id) if has_album(&row) => db::count_album_songs(pool, album_id).await?,
        _ => 0,
    };

    let tags = build_tags(&row, settings, album_song_count);
    debug!(
        song_id,
        album = %tags.album,
        track = %tags.track_position,
        "Resolved tags"
    );

    Ok(ResolvedSong {
        song_id,
        filepath: row.filepath,
        tags,
    })
}

fn has_album(row: &SongTagRow) -> bool {
    row.album_name.as_deref().is_some_and(|name| !name.is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Apply inheritance and singles rules to a fetched row.
///
/// `album_song_count` is only consulted when the song has an album.
pub fn build_tags(row: &SongTagRow, settings: Settings, album_song_count: i64) -> ResolvedTags {
    let artist = row.artists.clone().unwrap_or_default();

    let genre = non_empty(row.genre.as_deref())
        .or(non_empty(row.album_genre.as_deref()))
        .unwrap_or_default()
        .to_string();

    let album_artist = non_empty(row.album_artists.as_deref())
        .unwrap_or(&artist)
        .to_string();

    let artwork_path = non_empty(row.artwork_path.as_deref())
        .or(non_empty(row.album_artwork_path.as_deref()))
        .map(str::to_string);

    let mut tags = ResolvedTags {
        title: row.name.clone(),
        artist,
        album_artist,
        album: row.album_name.clone().unwrap_or_default(),
        genre,
        year: row.year.unwrap_or(0).max(0),
        producers: row.producers.clone().unwrap_or_default(),
        artwork_path,
        ..Default::default()
    };

    if has_album(row) {
        tags.set_track(row.track_number.unwrap_or(0), album_song_count);
    } else if settings.automatically_make_singles {
        tags.album = format!("{} - Single", row.name);
        tags.set_track(1, 1);
    } else {
        tags.clear_track();
    }

    tags
}
