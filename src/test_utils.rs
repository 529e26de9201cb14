//! Test utilities and fixtures for catalog-tagger tests.
//!
//! This module provides a migrated temporary catalog, seed helpers for the
//! catalog tables (which this crate otherwise never writes), and a fully
//! populated [`ResolvedTags`] factory.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{temp_db, insert_song, SongSeed};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     let id = insert_song(&pool, SongSeed::new("Title", "songs/a.mp3")).await;
//!     // ... test logic
//! }
//! ```

use std::path::{Path, PathBuf};

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::tags::ResolvedTags;

/// Creates a temporary database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically.
///
/// Keep the TempDir alive for the duration of your test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");

    let pool = crate::db::init_db(&crate::db::db_url(&db_path))
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// Column values for a seeded song.
#[derive(Debug, Clone)]
pub struct SongSeed {
    pub name: String,
    pub filepath: String,
    pub album_id: Option<i64>,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub track_number: Option<i64>,
    pub artwork_path: Option<String>,
}

impl SongSeed {
    /// A song with only the required columns set.
    pub fn new(name: &str, filepath: &str) -> Self {
        Self {
            name: name.to_string(),
            filepath: filepath.to_string(),
            album_id: None,
            genre: None,
            year: None,
            track_number: None,
            artwork_path: None,
        }
    }
}

pub async fn insert_song(pool: &SqlitePool, seed: SongSeed) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO songs (name, filepath, album_id, genre, year, track_number, artwork_path)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&seed.name)
    .bind(&seed.filepath)
    .bind(seed.album_id)
    .bind(&seed.genre)
    .bind(seed.year)
    .bind(seed.track_number)
    .bind(&seed.artwork_path)
    .execute(pool)
    .await
    .expect("Failed to insert song")
    .last_insert_rowid()
}

pub async fn insert_artist(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO artists (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to insert artist")
        .last_insert_rowid()
}

pub async fn insert_album(
    pool: &SqlitePool,
    name: &str,
    genre: Option<&str>,
    artwork_path: Option<&str>,
) -> i64 {
    sqlx::query("INSERT INTO albums (name, genre, artwork_path) VALUES (?, ?, ?)")
        .bind(name)
        .bind(genre)
        .bind(artwork_path)
        .execute(pool)
        .await
        .expect("Failed to insert album")
        .last_insert_rowid()
}

pub async fn insert_producer(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO producers (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to insert producer")
        .last_insert_rowid()
}

/// Adds an alias to a producer; an empty `artist_ids` makes it global.
pub async fn insert_alias(pool: &SqlitePool, producer_id: i64, alias: &str, artist_ids: &[i64]) -> i64 {
    let alias_id = sqlx::query("INSERT INTO producer_aliases (producer_id, alias) VALUES (?, ?)")
        .bind(producer_id)
        .bind(alias)
        .execute(pool)
        .await
        .expect("Failed to insert alias")
        .last_insert_rowid();

    for artist_id in artist_ids {
        sqlx::query("INSERT INTO producer_alias_artists (alias_id, artist_id) VALUES (?, ?)")
            .bind(alias_id)
            .bind(artist_id)
            .execute(pool)
            .await
            .expect("Failed to restrict alias");
    }

    alias_id
}

pub async fn link_song_artist(pool: &SqlitePool, song_id: i64, artist_id: i64, order: i64) {
    sqlx::query(r#"INSERT INTO song_artists (song_id, artist_id, "order") VALUES (?, ?, ?)"#)
        .bind(song_id)
        .bind(artist_id)
        .bind(order)
        .execute(pool)
        .await
        .expect("Failed to link song artist");
}

pub async fn link_album_artist(pool: &SqlitePool, album_id: i64, artist_id: i64, order: i64) {
    sqlx::query(r#"INSERT INTO album_artists (album_id, artist_id, "order") VALUES (?, ?, ?)"#)
        .bind(album_id)
        .bind(artist_id)
        .bind(order)
        .execute(pool)
        .await
        .expect("Failed to link album artist");
}

pub async fn link_song_producer(pool: &SqlitePool, song_id: i64, producer_id: i64, order: i64) {
    sqlx::query(r#"INSERT INTO song_producers (song_id, producer_id, "order") VALUES (?, ?, ?)"#)
        .bind(song_id)
        .bind(producer_id)
        .bind(order)
        .execute(pool)
        .await
        .expect("Failed to link song producer");
}

/// Toggle the singles-synthesis setting.
pub async fn set_singles(pool: &SqlitePool, enabled: bool) {
    sqlx::query("UPDATE settings SET automatically_make_singles = ? WHERE id = 1")
        .bind(enabled)
        .execute(pool)
        .await
        .expect("Failed to update settings");
}

/// Write `bytes` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// `fLaC` + a 44.1 kHz stereo 16-bit STREAMINFO + 4 bytes of padding.
///
/// No audio frames follow; enough for every tag reader and writer.
pub fn minimal_flac() -> Vec<u8> {
    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 34]);
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]); // block sizes
    bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]); // frame sizes
    bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0, 0, 0, 0]); // rate, channels, bps, samples
    bytes.extend_from_slice(&[0u8; 16]); // md5
    bytes.extend_from_slice(&[0x81, 0x00, 0x00, 0x04, 0, 0, 0, 0]);
    bytes
}

/// Creates a ResolvedTags with every field populated.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let tags = ResolvedTags { genre: String::new(), ..mock_resolved_tags() };
/// ```
pub fn mock_resolved_tags() -> ResolvedTags {
    ResolvedTags {
        title: "Night Drive".to_string(),
        artist: "Ava, Ben".to_string(),
        album_artist: "Ava".to_string(),
        album: "Coastlines".to_string(),
        genre: "Synthpop".to_string(),
        year: 2021,
        track_number: 3,
        track_total: 9,
        track_position: "3/9".to_string(),
        producers: "Max Martin, Shellback".to_string(),
        artwork_path: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_db_creates_working_database() {
        let (pool, _dir) = temp_db().await;
        let ids = crate::db::song_ids_for_album(&pool, 1).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_insert_song_round_trips() {
        let (pool, _dir) = temp_db().await;
        let id = insert_song(
            &pool,
            SongSeed {
                track_number: Some(4),
                ..SongSeed::new("Seeded", "songs/seeded.flac")
            },
        )
        .await;
        assert!(id > 0);

        let row = crate::db::get_song_tag_row(&pool, id).await.unwrap().unwrap();
        assert_eq!(row.name, "Seeded");
        assert_eq!(row.filepath, "songs/seeded.flac");
        assert_eq!(row.track_number, Some(4));
    }

    #[test]
    fn test_mock_resolved_tags_position_matches_numbers() {
        let tags = mock_resolved_tags();
        assert_eq!(tags.track_position, "3/9");
        assert!(tags.track_number > 0);
    }
}
