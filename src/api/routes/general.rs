//! Root endpoint.

/// Plain-text answer for `GET /`, useful as a liveness probe.
pub async fn index() -> &'static str {
    "Silence is golden"
}
