//! Catalog entities read by the tag writer.
//!
//! These are derived from SQLx for database mapping. The catalog is owned by
//! another part of the application; this crate only reads it.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `songs` - Audio files with per-song overrides (genre, year, artwork)
//! - `albums` - Albums with optional genre and artwork inherited by songs
//! - `artists` - Artist records linked through `song_artists` / `album_artists`
//! - `producers`, `producer_aliases`, `producer_alias_artists` - Producer credits
//! - `settings` - Singleton row of global flags

use serde::Serialize;
use sqlx::FromRow;

/// One song joined with everything needed to build its tags.
///
/// Artist, album-artist and producer lists arrive already joined with `", "`
/// in link order.
#[derive(Debug, Clone, FromRow)]
pub struct SongTagRow {
    /// Database ID
    pub id: i64,
    /// Song title
    pub name: String,
    /// Path of the audio file, relative to the library root
    pub filepath: String,
    /// Song-level genre
    pub genre: Option<String>,
    /// Song-level release year
    pub year: Option<i64>,
    /// Position on the album
    pub track_number: Option<i64>,
    /// Song-level artwork path, relative to the library root
    pub artwork_path: Option<String>,
    /// Album foreign key
    pub album_id: Option<i64>,
    /// Album name (from the joined album)
    pub album_name: Option<String>,
    /// Album genre, used when the song has none
    pub album_genre: Option<String>,
    /// Album artwork path, used when the song has none
    pub album_artwork_path: Option<String>,
    /// Song artists joined with ", "
    pub artists: Option<String>,
    /// Album artists joined with ", "
    pub album_artists: Option<String>,
    /// Credited producers joined with ", "
    pub producers: Option<String>,
}

/// Global settings singleton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Upload flow drops track numbers read from files
    pub clear_track_number_on_upload: bool,
    /// Upload flow also imports into Apple Music
    pub import_to_apple_music: bool,
    /// Album-less songs are tagged as "<title> - Single", track 1/1
    pub automatically_make_singles: bool,
}

/// A producer alias with its artist restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerAlias {
    pub id: i64,
    pub alias: String,
    /// Empty means the alias applies to every artist
    pub artist_ids: Vec<i64>,
}

/// A producer together with all of its aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    pub id: i64,
    pub name: String,
    pub aliases: Vec<ProducerAlias>,
}
