//! Bearer-credential helpers for integration tests.
//!
//! `MockAuth` signs a real token with the test secret so requests go through
//! the same extractor as production traffic.

use axum::http::HeaderValue;

use crm_auth_types::token::Authenticator;
use crm_domain::user::{Caller, Role};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub caller: Caller,
}

impl MockAuth {
    pub fn new(caller: Caller) -> Self {
        Self { caller }
    }

    pub fn admin() -> Self {
        Self::new(admin())
    }

    pub fn manager() -> Self {
        Self::new(manager())
    }

    pub fn rep(id: &str) -> Self {
        Self::new(rep(id))
    }

    pub fn authenticator() -> Authenticator {
        Authenticator::new(TEST_JWT_SECRET)
    }

    pub fn token(&self) -> String {
        Self::authenticator().issue(&self.caller).unwrap().0
    }

    /// `Authorization: Bearer <token>` value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap()
    }
}

pub fn admin() -> Caller {
    Caller::new("u1", "admin@crm.com", Role::Admin)
}

pub fn manager() -> Caller {
    Caller::new("u2", "manager@crm.com", Role::Manager)
}

pub fn rep(id: &str) -> Caller {
    Caller::new(id, format!("{id}@crm.com"), Role::Rep)
}
