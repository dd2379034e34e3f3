//! Request error taxonomy and its mapping to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// What the server does when a request hits a fatal-class error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ErrorPolicy {
    /// Answer the request with a 500 and keep serving.
    #[default]
    Respond,
    /// Log the error and terminate the process.
    FailFast,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Respond => write!(f, "respond"),
            ErrorPolicy::FailFast => write!(f, "fail-fast"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid album ID")]
    InvalidAlbumId,

    #[error("Invalid year")]
    InvalidYear,

    #[error("Album not found")]
    AlbumNotFound,

    #[error("Invalid album ID in path: {0:?}")]
    MalformedPathId(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// Marker left in the extensions of a response produced by a fatal-class
/// error, picked up by the error policy layer.
#[derive(Clone, Debug)]
pub struct FatalError {
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidAlbumId | ApiError::InvalidYear => StatusCode::BAD_REQUEST,
            ApiError::AlbumNotFound => StatusCode::NOT_FOUND,
            ApiError::MalformedPathId(_) | ApiError::MalformedBody(_) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Label used for logs and the errors metric; `None` for client errors.
    pub fn fatal_kind(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidAlbumId | ApiError::InvalidYear | ApiError::AlbumNotFound => None,
            ApiError::MalformedPathId(_) => Some("malformed_path_id"),
            ApiError::MalformedBody(_) => Some("malformed_body"),
            ApiError::Store(_) => Some("store"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        match self.fatal_kind() {
            None => (status, message).into_response(),
            Some(kind) => {
                error!("{}", message);
                let mut response = (status, message.clone()).into_response();
                response
                    .extensions_mut()
                    .insert(FatalError { kind, message });
                response
            }
        }
    }
}
