//! AlbumStore trait definition.

use super::models::{Album, AlbumId, AlbumPayload};
use anyhow::Result;

/// Storage backend for album records.
///
/// Every call maps to a single statement against the backing store; there
/// is no caching and no existence check on writes.
pub trait AlbumStore: Send + Sync {
    /// Get every album, in whatever order the store returns them.
    fn list_albums(&self) -> Result<Vec<Album>>;

    /// Get an album by ID.
    fn get_album(&self, id: AlbumId) -> Result<Option<Album>>;

    /// Insert a new album. Returns the store-assigned ID.
    fn insert_album(&self, payload: &AlbumPayload) -> Result<AlbumId>;

    /// Overwrite title, artist and year of an album. Returns the number of affected rows.
    fn update_album(&self, id: AlbumId, payload: &AlbumPayload) -> Result<usize>;

    /// Delete an album. Returns the number of affected rows.
    fn delete_album(&self, id: AlbumId) -> Result<usize>;

    /// Get the number of albums in the store.
    fn get_albums_count(&self) -> usize;
}
