//! Album models shared by the store and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Store-assigned album identifier (the SQLite rowid).
pub type AlbumId = i64;

/// A persisted album record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub year: i64,
}

/// The mutable fields of an album, as submitted by a client.
///
/// Missing fields decode to their zero value and unknown fields
/// (an `id` included) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlbumPayload {
    pub title: String,
    pub artist: String,
    pub year: i64,
}

impl AlbumPayload {
    pub fn into_album(self, id: AlbumId) -> Album {
        Album {
            id,
            title: self.title,
            artist: self.artist,
            year: self.year,
        }
    }
}
