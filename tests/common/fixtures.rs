//! Test fixture creation for the album database

use super::constants::*;
use album_server::album_store::{AlbumPayload, AlbumStore, SqliteAlbumStore};
use anyhow::{ensure, Result};
use std::path::PathBuf;
use tempfile::TempDir;

fn payload(title: &str, artist: &str, year: i64) -> AlbumPayload {
    AlbumPayload {
        title: title.to_string(),
        artist: artist.to_string(),
        year,
    }
}

/// Creates a temporary album database holding the seeded albums.
/// Returns (temp_dir, db_path)
pub fn create_test_db_with_albums() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("albums.db");

    let store = SqliteAlbumStore::new(&db_path)?;
    let first = store.insert_album(&payload(ALBUM_1_TITLE, ALBUM_1_ARTIST, ALBUM_1_YEAR))?;
    let second = store.insert_album(&payload(ALBUM_2_TITLE, ALBUM_2_ARTIST, ALBUM_2_YEAR))?;
    ensure!(
        first == ALBUM_1_ID && second == ALBUM_2_ID,
        "Unexpected seeded album ids: {} {}",
        first,
        second
    );

    Ok((dir, db_path))
}
