use anyhow::Context as _;
use tracing::{info, warn};

use crm_auth_types::password::{PasswordError, hash_password, needs_rehash, verify_password};
use crm_auth_types::token::Authenticator;
use crm_domain::id::UserId;
use crm_domain::user::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, non_empty};
use crate::error::CrmServiceError;

/// Argon2 is CPU-bound; keep it off the async workers.
pub(crate) async fn hash_on_blocking_pool(password: String) -> Result<String, CrmServiceError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("join password hashing task")?
        .context("hash password")?;
    Ok(hash)
}

/// A stored hash in a format we cannot check counts as a mismatch.
async fn verify_on_blocking_pool(password: String, hash: String) -> Result<bool, CrmServiceError> {
    let result = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("join password verification task")?;
    match result {
        Ok(matches) => Ok(matches),
        Err(PasswordError::InvalidHashFormat(detail)) => {
            warn!(%detail, "unrecognised password hash");
            Ok(false)
        }
        Err(e) => Err(anyhow::Error::from(e).context("verify password").into()),
    }
}

/// Token plus the account it was issued for.
#[derive(Debug)]
pub struct AuthOutput {
    pub token: String,
    pub user: User,
}

fn issue(authenticator: &Authenticator, user: User) -> Result<AuthOutput, CrmServiceError> {
    let (token, _exp) = authenticator
        .issue(&user.as_caller())
        .map_err(|e| CrmServiceError::Internal(e.into()))?;
    Ok(AuthOutput { token, user })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Self-service sign-up. Any role may be requested; `rep` when omitted.
pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
    pub authenticator: Authenticator,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthOutput, CrmServiceError> {
        let (Some(name), Some(email), Some(password)) = (
            non_empty(input.name),
            non_empty(input.email),
            non_empty(input.password),
        ) else {
            return Err(CrmServiceError::Validation(
                "name, email and password are required",
            ));
        };
        let role = match input.role.as_deref() {
            Some(r) => Role::from_wire(r).ok_or(CrmServiceError::Validation("invalid role"))?,
            None => Role::default(),
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(CrmServiceError::UserAlreadyExists);
        }

        let user = User {
            id: UserId::generate(),
            name,
            email,
            password_hash: hash_on_blocking_pool(password).await?,
            role,
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        issue(&self.authenticator, user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub authenticator: Authenticator,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, CrmServiceError> {
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(CrmServiceError::InvalidCredentials);
        };
        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(CrmServiceError::InvalidCredentials)?;

        if !verify_on_blocking_pool(password.clone(), user.password_hash.clone()).await? {
            return Err(CrmServiceError::InvalidCredentials);
        }

        if needs_rehash(&user.password_hash) {
            user.password_hash = hash_on_blocking_pool(password).await?;
            // Login still succeeds when the upgrade cannot be stored.
            match self.users.update(&user).await {
                Ok(true) => info!(user_id = %user.id, "password hash upgraded to argon2id"),
                Ok(false) => warn!(user_id = %user.id, "user vanished during hash upgrade"),
                Err(e) => warn!(user_id = %user.id, error = %e, "failed to store upgraded hash"),
            }
        }
        issue(&self.authenticator, user)
    }
}
