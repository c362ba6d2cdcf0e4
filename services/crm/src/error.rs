use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// CRM service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CrmServiceError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("lead not found")]
    LeadNotFound,
    #[error("opportunity not found")]
    OpportunityNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("lead with this email already exists")]
    LeadAlreadyExists,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CrmServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::LeadNotFound => "LEAD_NOT_FOUND",
            Self::OpportunityNotFound => "OPPORTUNITY_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::LeadAlreadyExists => "LEAD_ALREADY_EXISTS",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<JsonRejection> for CrmServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for CrmServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Duplicates are reported as 400, matching the web client's expectations.
            Self::Validation(_)
            | Self::InvalidBody(_)
            | Self::UserAlreadyExists
            | Self::LeadAlreadyExists => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::LeadNotFound | Self::OpportunityNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and already visible in the TraceLayer access log.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
