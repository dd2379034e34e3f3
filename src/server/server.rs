use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info};

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;

use super::albums::{
    create_album_from_query, delete_album, get_album, list_albums, post_album, put_album,
    update_album_from_query,
};
use super::metrics::make_metrics_app;
use super::{enforce_error_policy, log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub albums: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        albums: state.album_store.get_albums_count(),
    };
    Json(stats)
}

pub fn make_app(config: ServerConfig, album_store: GuardedAlbumStore) -> Router {
    let state = ServerState::new(config.clone(), album_store);

    Router::new()
        .route("/", get(home))
        .route("/albums", get(list_albums))
        .route("/albums/{id}", get(get_album))
        .route("/albumsPost", post(post_album))
        .route("/albumsPut/{id}", put(put_album))
        .route("/albumsDelete/{id}", delete(delete_album))
        .route("/albumsCreate", post(create_album_from_query))
        .route("/albumsUpdate/{id}", put(update_album_from_query))
        .layer(middleware::from_fn_with_state(
            config.error_policy,
            enforce_error_policy,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server");
}

pub async fn run_server(
    album_store: GuardedAlbumStore,
    config: ServerConfig,
    listen_address: &str,
    metrics_address: Option<String>,
) -> Result<()> {
    if let Some(metrics_address) = metrics_address {
        let metrics_listener = tokio::net::TcpListener::bind(&metrics_address)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {}", metrics_address))?;
        let metrics_app = make_metrics_app(album_store.clone());
        info!("Metrics available at http://{}/metrics", metrics_address);
        tokio::spawn(async move {
            if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
                error!("Metrics server stopped: {}", err);
            }
        });
    }

    info!(
        "Error policy: {}, requests logging level: {}",
        config.error_policy, config.requests_logging_level
    );
    let app = make_app(config, album_store);

    let listener = tokio::net::TcpListener::bind(listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", listen_address))?;
    info!("Listening on {}", listen_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
