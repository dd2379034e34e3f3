//! SQLite schema definition for the album database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

pub const ALBUM_TABLE_NAME: &str = "album";

/// `id` is an alias of the rowid, so SQLite assigns it on insert.
const ALBUM_TABLE: Table = Table {
    name: ALBUM_TABLE_NAME,
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", SqlType::Text, non_null = true),
        sqlite_column!("artist", SqlType::Text, non_null = true),
        sqlite_column!("year", SqlType::Integer, non_null = true),
    ],
};

pub const ALBUM_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ALBUM_TABLE],
}];
