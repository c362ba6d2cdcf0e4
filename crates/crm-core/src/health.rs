use axum::http::StatusCode;

/// `GET /healthz`: the process is up and serving requests.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a readiness probe result to a status code, logging the failure.
pub fn readiness<E: std::fmt::Display>(result: Result<(), E>) -> StatusCode {
    match result {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            ::tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
