use crm::error::CrmServiceError;
use crm::usecase::user::{
    DEMO_USERS, DeleteUserUseCase, ListUsersUseCase, SeedDemoUsersUseCase, UpdateUserInput,
    UpdateUserUseCase,
};
use crm_auth_types::password::verify_password;
use crm_domain::id::UserId;
use crm_domain::user::Role;
use crm_testing::auth::{admin, manager, rep};

use crate::helpers::{InMemoryUsers, test_user};

fn seeded_users() -> InMemoryUsers {
    InMemoryUsers::new(vec![
        test_user("u1", "admin@crm.com", Role::Admin),
        test_user("u3", "rep@crm.com", Role::Rep),
    ])
}

fn update_input(email: &str, role: &str) -> UpdateUserInput {
    UpdateUserInput {
        name: Some("Alice Senior".into()),
        email: Some(email.into()),
        role: Some(role.into()),
    }
}

#[tokio::test]
async fn should_list_users_for_admin_only() {
    let usecase = ListUsersUseCase {
        repo: seeded_users(),
    };
    assert_eq!(usecase.execute(&admin()).await.unwrap().len(), 2);
    assert!(matches!(
        usecase.execute(&rep("u3")).await,
        Err(CrmServiceError::Forbidden)
    ));
}

#[tokio::test]
async fn should_update_profile_and_keep_password_hash() {
    let repo = seeded_users();
    let usecase = UpdateUserUseCase { repo: repo.clone() };

    let user = usecase
        .execute(
            &admin(),
            &UserId::from("u3"),
            update_input("alice@crm.com", "manager"),
        )
        .await
        .unwrap();
    assert_eq!(user.role, Role::Manager);
    assert_eq!(user.email, "alice@crm.com");
    assert_eq!(user.password_hash, "$argon2id$placeholder");
    assert_eq!(repo.users.lock().unwrap()[1], user);
}

#[tokio::test]
async fn should_allow_keeping_own_email_on_update() {
    let usecase = UpdateUserUseCase {
        repo: seeded_users(),
    };
    let user = usecase
        .execute(
            &admin(),
            &UserId::from("u3"),
            update_input("rep@crm.com", "rep"),
        )
        .await
        .unwrap();
    assert_eq!(user.name, "Alice Senior");
}

#[tokio::test]
async fn should_reject_email_taken_by_another_user() {
    let usecase = UpdateUserUseCase {
        repo: seeded_users(),
    };
    let result = usecase
        .execute(
            &admin(),
            &UserId::from("u3"),
            update_input("admin@crm.com", "rep"),
        )
        .await;
    assert!(matches!(result, Err(CrmServiceError::UserAlreadyExists)));
}

#[tokio::test]
async fn should_reject_invalid_role_on_update() {
    let usecase = UpdateUserUseCase {
        repo: seeded_users(),
    };
    let result = usecase
        .execute(
            &admin(),
            &UserId::from("u3"),
            update_input("rep@crm.com", "superuser"),
        )
        .await;
    assert!(matches!(result, Err(CrmServiceError::Validation(_))));
}

#[tokio::test]
async fn should_delete_user_once() {
    let repo = seeded_users();
    let usecase = DeleteUserUseCase { repo: repo.clone() };

    assert!(matches!(
        usecase.execute(&manager(), &UserId::from("u3")).await,
        Err(CrmServiceError::Forbidden)
    ));
    usecase.execute(&admin(), &UserId::from("u3")).await.unwrap();
    assert_eq!(repo.users.lock().unwrap().len(), 1);
    assert!(matches!(
        usecase.execute(&admin(), &UserId::from("u3")).await,
        Err(CrmServiceError::UserNotFound)
    ));
}

#[tokio::test]
async fn should_seed_demo_users_only_into_empty_store() {
    let repo = InMemoryUsers::default();
    let usecase = SeedDemoUsersUseCase { repo: repo.clone() };

    assert_eq!(usecase.execute().await.unwrap(), DEMO_USERS.len());
    {
        let users = repo.users.lock().unwrap();
        let roles: Vec<_> = users.iter().map(|u| u.role).collect();
        assert_eq!(roles, [Role::Admin, Role::Manager, Role::Rep]);
        let rep = users.iter().find(|u| u.email == "rep@crm.com").unwrap();
        assert!(verify_password("rep123", &rep.password_hash).unwrap());
    }

    assert_eq!(usecase.execute().await.unwrap(), 0);
    assert_eq!(repo.users.lock().unwrap().len(), 3);
}
