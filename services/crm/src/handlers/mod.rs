use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::error::CrmServiceError;

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod lead;
pub mod opportunity;
pub mod user;

/// JSON body extractor whose rejection is a `CrmServiceError` (400) instead of
/// axum's plain-text response.
pub type JsonBody<T> = WithRejection<Json<T>, CrmServiceError>;

/// `{ "message": ... }` body returned by delete endpoints.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}
