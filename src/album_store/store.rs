//! SQLite-backed album store.

use super::models::{Album, AlbumId, AlbumPayload};
use super::schema::ALBUM_VERSIONED_SCHEMAS;
use super::trait_def::AlbumStore;
use crate::sqlite_persistence::VersionedSchema;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Album store holding the single shared connection to the database.
#[derive(Clone)]
pub struct SqliteAlbumStore {
    conn: Arc<Mutex<Connection>>,
}

fn initialize_schema(conn: &Connection) -> Result<()> {
    let latest_version = ALBUM_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &ALBUM_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating album db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    match VersionedSchema::read_version(conn)? {
        Some(version) if version == latest_version => {}
        Some(version) => bail!(
            "Album db is at schema version {}, expected {}",
            version,
            latest_version
        ),
        None => info!("Album db carries no schema version, validating tables"),
    }
    latest_schema
        .validate(conn)
        .context("Album db does not match the expected schema")
}

impl SqliteAlbumStore {
    /// Opens (creating it if needed) the album database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref()).with_context(|| {
            format!("Failed to open album database {:?}", db_path.as_ref())
        })?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        initialize_schema(&conn)?;

        let album_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM album", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened album store: {} albums", album_count);

        Ok(SqliteAlbumStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            year: row.get(3)?,
        })
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Album db connection mutex poisoned"))
    }
}

impl AlbumStore for SqliteAlbumStore {
    fn list_albums(&self) -> Result<Vec<Album>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare_cached("SELECT id, title, artist, year FROM album")?;
        let albums = stmt
            .query_map([], Self::parse_album_row)?
            .collect::<Result<Vec<Album>, _>>()?;
        Ok(albums)
    }

    fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        let conn = self.lock_conn()?;
        let mut stmt =
            conn.prepare_cached("SELECT id, title, artist, year FROM album WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::parse_album_row) {
            Ok(album) => Ok(Some(album)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_album(&self, payload: &AlbumPayload) -> Result<AlbumId> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO album (title, artist, year) VALUES (?1, ?2, ?3)",
            params![&payload.title, &payload.artist, payload.year],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_album(&self, id: AlbumId, payload: &AlbumPayload) -> Result<usize> {
        let conn = self.lock_conn()?;
        let affected = conn.execute(
            "UPDATE album SET title = ?1, artist = ?2, year = ?3 WHERE id = ?4",
            params![&payload.title, &payload.artist, payload.year, id],
        )?;
        Ok(affected)
    }

    fn delete_album(&self, id: AlbumId) -> Result<usize> {
        let conn = self.lock_conn()?;
        let affected = conn.execute("DELETE FROM album WHERE id = ?1", params![id])?;
        Ok(affected)
    }

    fn get_albums_count(&self) -> usize {
        let Ok(conn) = self.lock_conn() else {
            return 0;
        };
        conn.query_row("SELECT COUNT(*) FROM album", [], |r| r.get::<_, i64>(0))
            .map(|count| count as usize)
            .unwrap_or(0)
    }
}
