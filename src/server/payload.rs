//! Input extraction strategies for album writes.
//!
//! The body-encoded and query-encoded create/update routes share one
//! persistence routine each; they only differ in the [`PayloadSource`]
//! they hand to it.

use super::error::ApiError;
use crate::album_store::{AlbumId, AlbumPayload};
use axum::body::Bytes;

pub trait PayloadSource {
    fn into_payload(self) -> Result<AlbumPayload, ApiError>;
}

/// Raw request body holding a JSON album.
///
/// The content type is not checked. Only the first JSON value is decoded,
/// anything after it is ignored.
pub struct JsonBody(pub Bytes);

impl PayloadSource for JsonBody {
    fn into_payload(self) -> Result<AlbumPayload, ApiError> {
        let mut values = serde_json::Deserializer::from_slice(&self.0).into_iter::<AlbumPayload>();
        match values.next() {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(err)) => Err(ApiError::MalformedBody(err.to_string())),
            None => Err(ApiError::MalformedBody("empty body".to_string())),
        }
    }
}

/// Album fields taken from URL query parameters.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AlbumQuery {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub year: Option<String>,
}

impl AlbumQuery {
    /// Builds the query from decoded key/value pairs, keeping the first
    /// occurrence of each key.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = AlbumQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "title" => &mut query.title,
                "artist" => &mut query.artist,
                "year" => &mut query.year,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

impl PayloadSource for AlbumQuery {
    fn into_payload(self) -> Result<AlbumPayload, ApiError> {
        let year = self
            .year
            .as_deref()
            .unwrap_or_default()
            .parse::<i64>()
            .map_err(|_| ApiError::InvalidYear)?;
        Ok(AlbumPayload {
            title: self.title.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            year,
        })
    }
}

/// Parses an album id from a path segment.
pub fn parse_album_id(raw: &str) -> Option<AlbumId> {
    raw.parse::<AlbumId>().ok()
}
