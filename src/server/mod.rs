mod albums;
pub mod config;
mod error;
mod http_layers;
pub mod metrics;
mod payload;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorPolicy, FatalError};
pub use http_layers::*;
pub use payload::{AlbumQuery, JsonBody, PayloadSource};
#[allow(unused_imports)] // Used by main.rs
pub use server::run_server;
