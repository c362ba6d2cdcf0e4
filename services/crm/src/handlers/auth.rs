use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::error::CrmServiceError;
use crate::handlers::JsonBody;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{
    AuthOutput, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthOutput> for AuthResponse {
    fn from(output: AuthOutput) -> Self {
        Self {
            token: output.token,
            user: output.user.into(),
        }
    }
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, CrmServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        authenticator: state.authenticator.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(output.into()))
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), CrmServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        authenticator: state.authenticator.clone(),
    };
    let output = usecase
        .execute(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(output.into())))
}
