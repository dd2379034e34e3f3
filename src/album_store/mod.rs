mod models;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use schema::{ALBUM_TABLE_NAME, ALBUM_VERSIONED_SCHEMAS};
pub use store::SqliteAlbumStore;
pub use trait_def::AlbumStore;
