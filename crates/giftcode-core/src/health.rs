//! Probe endpoints the gift router mounts next to its business routes.

use axum::http::StatusCode;

/// `GET /healthz`: the process is up and answering.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: the service can take traffic. The gift service has no
/// warm-up phase, so this reports ready unconditionally.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
