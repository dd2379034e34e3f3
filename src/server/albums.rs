//! Album route handlers.

use super::error::ApiError;
use super::metrics;
use super::payload::{parse_album_id, AlbumQuery, JsonBody, PayloadSource};
use super::state::GuardedAlbumStore;
use crate::album_store::{Album, AlbumStore};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

const DELETED_MESSAGE: &str = "Album deleted successfully";

#[derive(Serialize)]
pub struct DeleteAlbumResponse {
    pub message: &'static str,
}

fn timed_query<T>(
    operation: &str,
    query: impl FnOnce() -> anyhow::Result<T>,
) -> Result<T, ApiError> {
    let start = Instant::now();
    let result = query();
    metrics::record_db_query(operation, start.elapsed());
    Ok(result?)
}

fn create_album(
    store: &dyn AlbumStore,
    source: impl PayloadSource,
) -> Result<Json<Album>, ApiError> {
    let payload = source.into_payload()?;
    let id = timed_query("insert", || store.insert_album(&payload))?;
    debug!("Created album {}", id);
    Ok(Json(payload.into_album(id)))
}

/// Echoes the request's view of the album, the store is not re-read.
fn update_album(
    store: &dyn AlbumStore,
    raw_id: &str,
    source: impl PayloadSource,
) -> Result<Json<Album>, ApiError> {
    let payload = source.into_payload()?;
    let id =
        parse_album_id(raw_id).ok_or_else(|| ApiError::MalformedPathId(raw_id.to_string()))?;
    let affected = timed_query("update", || store.update_album(id, &payload))?;
    if affected == 0 {
        debug!("Update of album {} matched no rows", id);
    }
    Ok(Json(payload.into_album(id)))
}

pub async fn list_albums(
    State(store): State<GuardedAlbumStore>,
) -> Result<Json<Vec<Album>>, ApiError> {
    let albums = timed_query("list", || store.list_albums())?;
    Ok(Json(albums))
}

pub async fn get_album(
    State(store): State<GuardedAlbumStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Album>, ApiError> {
    let id = parse_album_id(&raw_id).ok_or(ApiError::InvalidAlbumId)?;
    match timed_query("get", || store.get_album(id))? {
        Some(album) => Ok(Json(album)),
        None => Err(ApiError::AlbumNotFound),
    }
}

pub async fn post_album(
    State(store): State<GuardedAlbumStore>,
    body: Bytes,
) -> Result<Json<Album>, ApiError> {
    create_album(store.as_ref(), JsonBody(body))
}

pub async fn put_album(
    State(store): State<GuardedAlbumStore>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Album>, ApiError> {
    update_album(store.as_ref(), &raw_id, JsonBody(body))
}

pub async fn delete_album(
    State(store): State<GuardedAlbumStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteAlbumResponse>, ApiError> {
    let id =
        parse_album_id(&raw_id).ok_or_else(|| ApiError::MalformedPathId(raw_id.clone()))?;
    let affected = timed_query("delete", || store.delete_album(id))?;
    debug!("Deleted album {} ({} rows)", id, affected);
    Ok(Json(DeleteAlbumResponse {
        message: DELETED_MESSAGE,
    }))
}

pub async fn create_album_from_query(
    State(store): State<GuardedAlbumStore>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Album>, ApiError> {
    create_album(store.as_ref(), AlbumQuery::from_pairs(params))
}

pub async fn update_album_from_query(
    State(store): State<GuardedAlbumStore>,
    Path(raw_id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Album>, ApiError> {
    update_album(store.as_ref(), &raw_id, AlbumQuery::from_pairs(params))
}
