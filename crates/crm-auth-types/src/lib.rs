//! Auth types shared across CRM crates.
//!
//! Provides JWT issuance and validation, Argon2 password hashing, and the
//! `BearerIdentity` extractor.

pub mod identity;
pub mod password;
pub mod token;
