//! Response body helpers.

use axum::body::{Body, to_bytes};
use axum::response::Response;
use serde_json::Value;

/// Drain a response body and parse it as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serialize `value` into a request body.
pub fn json_request_body(value: &Value) -> Body {
    Body::from(serde_json::to_vec(value).unwrap())
}
