//! Applies the configured error policy to responses carrying a fatal-class error.

use crate::server::metrics::record_error;
use crate::server::{ErrorPolicy, FatalError};
use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

pub async fn enforce_error_policy(
    State(policy): State<ErrorPolicy>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;

    if let Some(fatal) = response.extensions().get::<FatalError>() {
        record_error(fatal.kind, &endpoint);
        if policy == ErrorPolicy::FailFast {
            error!(
                "Fatal {} error on {}, terminating: {}",
                fatal.kind, endpoint, fatal.message
            );
            std::process::exit(1);
        }
    }
    response
}
