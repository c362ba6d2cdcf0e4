use tracing::info;

use crm_domain::id::UserId;
use crm_domain::user::{Caller, Role};

use crate::domain::policy::require_admin;
use crate::domain::repository::UserRepository;
use crate::domain::types::{User, non_empty};
use crate::error::CrmServiceError;
use crate::usecase::auth::hash_on_blocking_pool;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<User>, CrmServiceError> {
        require_admin(caller)?;
        self.repo.list().await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Admin edit of a user's profile. The password hash is left untouched.
pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: &UserId,
        input: UpdateUserInput,
    ) -> Result<User, CrmServiceError> {
        require_admin(caller)?;
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CrmServiceError::UserNotFound)?;

        let (Some(name), Some(email), Some(role)) = (
            non_empty(input.name),
            non_empty(input.email),
            input.role,
        ) else {
            return Err(CrmServiceError::Validation("name, email and role are required"));
        };
        let role = Role::from_wire(&role).ok_or(CrmServiceError::Validation("invalid role"))?;

        let taken_by_other = self
            .repo
            .find_by_email(&email)
            .await?
            .is_some_and(|existing| existing.id != user.id);
        if taken_by_other {
            return Err(CrmServiceError::UserAlreadyExists);
        }

        user.name = name;
        user.email = email;
        user.role = role;
        if !self.repo.update(&user).await? {
            return Err(CrmServiceError::UserNotFound);
        }
        info!(user_id = %user.id, role = %user.role, "user updated");
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

/// Leads and opportunities owned by the deleted user are kept as-is.
pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, caller: &Caller, id: &UserId) -> Result<(), CrmServiceError> {
        require_admin(caller)?;
        if !self.repo.delete(id).await? {
            return Err(CrmServiceError::UserNotFound);
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

// ── SeedDemoUsers ────────────────────────────────────────────────────────────

/// `(name, email, password, role)` of the accounts created on first start.
pub const DEMO_USERS: [(&str, &str, &str, Role); 3] = [
    ("Admin User", "admin@crm.com", "admin123", Role::Admin),
    ("John Manager", "manager@crm.com", "manager123", Role::Manager),
    ("Alice Rep", "rep@crm.com", "rep123", Role::Rep),
];

pub struct SeedDemoUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SeedDemoUsersUseCase<R> {
    /// Creates the demo accounts if no user exists yet. Returns how many were created.
    pub async fn execute(&self) -> Result<usize, CrmServiceError> {
        if !self.repo.list().await?.is_empty() {
            return Ok(0);
        }
        for (name, email, password, role) in DEMO_USERS {
            let user = User {
                id: UserId::generate(),
                name: name.to_owned(),
                email: email.to_owned(),
                password_hash: hash_on_blocking_pool(password.to_owned()).await?,
                role,
            };
            self.repo.create(&user).await?;
        }
        info!(count = DEMO_USERS.len(), "seeded demo users");
        Ok(DEMO_USERS.len())
    }
}
