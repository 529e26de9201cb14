//! Catalog database access.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//! This crate only reads the catalog:
//! - The joined song row used to resolve tags
//! - Album track counts and the settings singleton
//! - Song-id enumeration for album, artist, and producer batches
//! - Producer dictionaries for filename matching
//!
//! # Example
//!
//! ```ignore
//! use catalog_tagger::db::{init_db, get_song_tag_row};
//!
//! let pool = init_db("sqlite:local.db").await?;
//! let row = get_song_tag_row(&pool, 12).await?;
//! ```

use std::collections::HashMap;

use crate::model::{Producer, ProducerAlias, Settings, SongTagRow};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Build a SQLite database URL from a file path.
pub fn db_url(path: &std::path::Path) -> String {
    format!("sqlite:{}", path.display())
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist and establishes a pool with
/// up to 5 connections, enough for every batch worker to hold one.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Fetch a song with its album, ordered artist names, ordered album-artist
/// names, and ordered producer names in one row.
///
/// Returns `None` when no song has this ID.
pub async fn get_song_tag_row(pool: &SqlitePool, song_id: i64) -> sqlx::Result<Option<SongTagRow>> {
    sqlx::query_as::<_, SongTagRow>(
        r#"
        SELECT
            s.id, s.name, s.filepath, s.genre, s.year, s.track_number,
            s.artwork_path, s.album_id,
            a.name AS album_name,
            a.genre AS album_genre,
            a.artwork_path AS album_artwork_path,
            (
                SELECT GROUP_CONCAT(ar.name, ', ' ORDER BY sa."order")
                FROM song_artists sa
                JOIN artists ar ON sa.artist_id = ar.id
                WHERE sa.song_id = s.id
            ) AS artists,
            (
                SELECT GROUP_CONCAT(ar.name, ', ' ORDER BY aa."order")
                FROM album_artists aa
                JOIN artists ar ON aa.artist_id = ar.id
                WHERE aa.album_id = s.album_id
            ) AS album_artists,
            (
                SELECT GROUP_CONCAT(p.name, ', ' ORDER BY sp."order")
                FROM song_producers sp
                JOIN producers p ON sp.producer_id = p.id
                WHERE sp.song_id = s.id
            ) AS producers
        FROM songs s
        LEFT JOIN albums a ON s.album_id = a.id
        WHERE s.id = ?
        "#,
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await
}

/// Count the songs that share an album.
pub async fn count_album_songs(pool: &SqlitePool, album_id: i64) -> sqlx::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM songs WHERE album_id = ?")
        .bind(album_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Read the settings singleton.
///
/// A missing row yields the defaults; this never writes to the catalog.
pub async fn get_settings(pool: &SqlitePool) -> sqlx::Result<Settings> {
    let settings = sqlx::query_as::<_, Settings>(
        r#"
        SELECT clear_track_number_on_upload, import_to_apple_music, automatically_make_singles
        FROM settings WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(settings.unwrap_or_default())
}

/// IDs of every song on an album, in insertion order.
pub async fn song_ids_for_album(pool: &SqlitePool, album_id: i64) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT id FROM songs WHERE album_id = ? ORDER BY id")
        .bind(album_id)
        .fetch_all(pool)
        .await
}

/// IDs of every song credited to a producer.
pub async fn song_ids_for_producer(pool: &SqlitePool, producer_id: i64) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT song_id FROM song_producers WHERE producer_id = ? ORDER BY song_id")
        .bind(producer_id)
        .fetch_all(pool)
        .await
}

/// IDs of every song linked to an artist.
pub async fn song_ids_for_artist(pool: &SqlitePool, artist_id: i64) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT song_id FROM song_artists WHERE artist_id = ? ORDER BY song_id")
        .bind(artist_id)
        .fetch_all(pool)
        .await
}

/// Artist IDs linked to a song, in credit order.
pub async fn song_artist_ids(pool: &SqlitePool, song_id: i64) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar(r#"SELECT artist_id FROM song_artists WHERE song_id = ? ORDER BY "order""#)
        .bind(song_id)
        .fetch_all(pool)
        .await
}

/// Load every producer with its aliases and alias artist restrictions.
///
/// Three flat queries stitched together in memory rather than one query per
/// producer.
pub async fn get_producers_with_aliases(pool: &SqlitePool) -> sqlx::Result<Vec<Producer>> {
    let producers: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, name FROM producers ORDER BY id")
            .fetch_all(pool)
            .await?;

    let aliases: Vec<(i64, i64, String)> =
        sqlx::query_as("SELECT id, producer_id, alias FROM producer_aliases ORDER BY id")
            .fetch_all(pool)
            .await?;

    let restrictions: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT alias_id, artist_id FROM producer_alias_artists ORDER BY alias_id, artist_id",
    )
    .fetch_all(pool)
    .await?;

    let mut artists_by_alias: HashMap<i64, Vec<i64>> = HashMap::new();
    for (alias_id, artist_id) in restrictions {
        artists_by_alias.entry(alias_id).or_default().push(artist_id);
    }

    let mut aliases_by_producer: HashMap<i64, Vec<ProducerAlias>> = HashMap::new();
    for (id, producer_id, alias) in aliases {
        aliases_by_producer
            .entry(producer_id)
            .or_default()
            .push(ProducerAlias {
                id,
                alias,
                artist_ids: artists_by_alias.remove(&id).unwrap_or_default(),
            });
    }

    Ok(producers
        .into_iter()
        .map(|(id, name)| Producer {
            id,
            name,
            aliases: aliases_by_producer.remove(&id).unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        insert_album, insert_alias, insert_artist, insert_producer, insert_song, link_album_artist,
        link_song_artist, link_song_producer, set_singles, temp_db, SongSeed,
    };

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = init_db(&db_url(&db_path)).await.expect("Failed to init db");
        assert!(db_path.exists());

        // Migration seeds the settings singleton
        let settings = get_settings(&pool).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_missing_song_returns_none() {
        let (pool, _dir) = temp_db().await;
        let row = get_song_tag_row(&pool, 999).await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_song_row_joins_ordered_names() {
        let (pool, _dir) = temp_db().await;

        let a = insert_artist(&pool, "Zed").await;
        let b = insert_artist(&pool, "Amy").await;
        let c = insert_artist(&pool, "Band").await;
        let album = insert_album(&pool, "Record", Some("Soul"), None).await;
        link_album_artist(&pool, album, c, 0).await;

        let song = insert_song(
            &pool,
            SongSeed {
                album_id: Some(album),
                ..SongSeed::new("Tune", "songs/tune.mp3")
            },
        )
        .await;
        // Link order deliberately differs from insertion order
        link_song_artist(&pool, song, b, 1).await;
        link_song_artist(&pool, song, a, 0).await;

        let p1 = insert_producer(&pool, "Second").await;
        let p2 = insert_producer(&pool, "First").await;
        link_song_producer(&pool, song, p2, 0).await;
        link_song_producer(&pool, song, p1, 1).await;

        let row = get_song_tag_row(&pool, song).await.unwrap().unwrap();
        assert_eq!(row.artists.as_deref(), Some("Zed, Amy"));
        assert_eq!(row.album_artists.as_deref(), Some("Band"));
        assert_eq!(row.producers.as_deref(), Some("First, Second"));
        assert_eq!(row.album_name.as_deref(), Some("Record"));
        assert_eq!(row.album_genre.as_deref(), Some("Soul"));
    }

    #[tokio::test]
    async fn test_song_without_links_has_null_lists() {
        let (pool, _dir) = temp_db().await;
        let song = insert_song(&pool, SongSeed::new("Lonely", "songs/lonely.mp3")).await;

        let row = get_song_tag_row(&pool, song).await.unwrap().unwrap();
        assert!(row.artists.is_none());
        assert!(row.album_artists.is_none());
        assert!(row.producers.is_none());
        assert!(row.album_name.is_none());
    }

    #[tokio::test]
    async fn test_count_album_songs_and_enumeration() {
        let (pool, _dir) = temp_db().await;
        let album = insert_album(&pool, "LP", None, None).await;
        let other = insert_album(&pool, "EP", None, None).await;

        let s1 = insert_song(&pool, SongSeed { album_id: Some(album), ..SongSeed::new("a", "a.mp3") }).await;
        let s2 = insert_song(&pool, SongSeed { album_id: Some(album), ..SongSeed::new("b", "b.mp3") }).await;
        insert_song(&pool, SongSeed { album_id: Some(other), ..SongSeed::new("c", "c.mp3") }).await;

        assert_eq!(count_album_songs(&pool, album).await.unwrap(), 2);
        assert_eq!(song_ids_for_album(&pool, album).await.unwrap(), vec![s1, s2]);
        assert_eq!(count_album_songs(&pool, 12345).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_settings_reflect_updates() {
        let (pool, _dir) = temp_db().await;
        set_singles(&pool, true).await;
        let settings = get_settings(&pool).await.unwrap();
        assert!(settings.automatically_make_singles);
        assert!(!settings.clear_track_number_on_upload);
    }

    #[tokio::test]
    async fn test_producers_with_scoped_aliases() {
        let (pool, _dir) = temp_db().await;
        let artist = insert_artist(&pool, "Rapper").await;
        let producer = insert_producer(&pool, "Max Martin").await;
        insert_alias(&pool, producer, "mm", &[]).await;
        insert_alias(&pool, producer, "maxie", &[artist]).await;
        insert_producer(&pool, "Solo").await;

        let producers = get_producers_with_aliases(&pool).await.unwrap();
        assert_eq!(producers.len(), 2);

        let max = producers.iter().find(|p| p.id == producer).unwrap();
        assert_eq!(max.aliases.len(), 2);
        assert!(max.aliases.iter().any(|a| a.alias == "mm" && a.artist_ids.is_empty()));
        assert!(max.aliases.iter().any(|a| a.alias == "maxie" && a.artist_ids == vec![artist]));
    }

    #[tokio::test]
    async fn test_song_ids_for_producer_and_artist() {
        let (pool, _dir) = temp_db().await;
        let artist = insert_artist(&pool, "Singer").await;
        let producer = insert_producer(&pool, "Beatsmith").await;
        let s1 = insert_song(&pool, SongSeed::new("one", "one.mp3")).await;
        let s2 = insert_song(&pool, SongSeed::new("two", "two.mp3")).await;
        link_song_producer(&pool, s2, producer, 0).await;
        link_song_artist(&pool, s1, artist, 0).await;
        link_song_artist(&pool, s2, artist, 0).await;

        assert_eq!(song_ids_for_producer(&pool, producer).await.unwrap(), vec![s2]);
        assert_eq!(song_ids_for_artist(&pool, artist).await.unwrap(), vec![s1, s2]);
        assert_eq!(song_artist_ids(&pool, s1).await.unwrap(), vec![artist]);
    }
}
