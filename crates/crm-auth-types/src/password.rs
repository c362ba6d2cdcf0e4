//! Password hashing and verification using Argon2id.
//!
//! Bcrypt hashes left by earlier deployments are still verified so those
//! accounts can log in and be upgraded.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Errors returned by password operations.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    HashingFailed(String),
    #[error("failed to verify password: {0}")]
    VerificationFailed(String),
    #[error("invalid password hash format: {0}")]
    InvalidHashFormat(String),
}

/// Hash a password with Argon2id default parameters and a random 16-byte salt.
///
/// Returns a PHC string (`$argon2id$v=19$...`) suitable for storage.
///
/// ```
/// use crm_auth_types::password::{hash_password, verify_password};
///
/// let hash = hash_password("admin123").unwrap();
/// assert!(verify_password("admin123", &hash).unwrap());
/// assert!(!verify_password("admin124", &hash).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}

/// True when `hash` is not an Argon2id PHC string and should be replaced
/// after the next successful verification.
pub fn needs_rehash(hash: &str) -> bool {
    !hash.starts_with("$argon2id$")
}

/// Verify a password against a stored Argon2 PHC hash or a bcrypt hash.
///
/// `Ok(false)` means a well-formed hash that does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    if is_bcrypt(hash) {
        return bcrypt::verify(password, hash)
            .map_err(|e| PasswordError::InvalidHashFormat(e.to_string()));
    }

    let parsed =
        PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHashFormat(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}
