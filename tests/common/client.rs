//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per album-server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn get_status(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Get status request failed")
    }

    // ========================================================================
    // Read Endpoints
    // ========================================================================

    /// GET /albums
    pub async fn list_albums(&self) -> Response {
        self.client
            .get(format!("{}/albums", self.base_url))
            .send()
            .await
            .expect("List albums request failed")
    }

    /// GET /albums/{id}
    ///
    /// Takes the raw path segment so tests can send non-numeric ids.
    pub async fn get_album(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/albums/{}", self.base_url, id))
            .send()
            .await
            .expect("Get album request failed")
    }

    // ========================================================================
    // Body-Encoded Write Endpoints
    // ========================================================================

    /// POST /albumsPost
    pub async fn post_album(&self, body: impl Into<reqwest::Body>) -> Response {
        self.client
            .post(format!("{}/albumsPost", self.base_url))
            .body(body)
            .send()
            .await
            .expect("Post album request failed")
    }

    /// PUT /albumsPut/{id}
    pub async fn put_album(&self, id: &str, body: impl Into<reqwest::Body>) -> Response {
        self.client
            .put(format!("{}/albumsPut/{}", self.base_url, id))
            .body(body)
            .send()
            .await
            .expect("Put album request failed")
    }

    /// DELETE /albumsDelete/{id}
    pub async fn delete_album(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/albumsDelete/{}", self.base_url, id))
            .send()
            .await
            .expect("Delete album request failed")
    }

    // ========================================================================
    // Query-Encoded Write Endpoints
    // ========================================================================

    /// POST /albumsCreate?title=..&artist=..&year=..
    pub async fn create_album_from_query(&self, params: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}/albumsCreate", self.base_url))
            .query(params)
            .send()
            .await
            .expect("Create album request failed")
    }

    /// PUT /albumsUpdate/{id}?title=..&artist=..&year=..
    pub async fn update_album_from_query(&self, id: &str, params: &[(&str, &str)]) -> Response {
        self.client
            .put(format!("{}/albumsUpdate/{}", self.base_url, id))
            .query(params)
            .send()
            .await
            .expect("Update album request failed")
    }
}
