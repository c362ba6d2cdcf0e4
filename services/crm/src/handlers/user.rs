use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crm_auth_types::identity::BearerIdentity;
use crm_domain::id::UserId;
use crm_domain::user::Role;

use crate::domain::types::User;
use crate::error::CrmServiceError;
use crate::handlers::{JsonBody, MessageResponse};
use crate::state::AppState;
use crate::usecase::user::{
    DeleteUserUseCase, ListUsersUseCase, UpdateUserInput, UpdateUserUseCase,
};

/// Public view of a user. The password hash never leaves the service.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, CrmServiceError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(&caller).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── PUT /api/users/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub async fn update_user(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserResponse>, CrmServiceError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            &caller,
            &UserId::from(id),
            UpdateUserInput {
                name: body.name,
                email: body.email,
                role: body.role,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /api/users/{id} ───────────────────────────────────────────────────

pub async fn delete_user(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, CrmServiceError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&caller, &UserId::from(id)).await?;
    Ok(MessageResponse::new("User deleted successfully"))
}
