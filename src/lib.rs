//! Album Server Library
//!
//! Exposes the internal modules to the binary and the end-to-end tests.

pub mod album_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

pub use album_store::{AlbumStore, SqliteAlbumStore};
pub use server::{run_server, ErrorPolicy, RequestsLoggingLevel};
