//! JWT bearer-token issuance and validation.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crm_domain::id::UserId;
use crm_domain::user::{Caller, Role};

/// Bearer-token lifetime in seconds (24 hours).
pub const ACCESS_TOKEN_EXP: u64 = 86_400;

/// Caller identity extracted from a validated token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub caller: Caller,
    pub exp: u64,
}

/// Errors returned by [`Authenticator`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id |
/// | `email` | custom | user email at issuance |
/// | `role` | custom | `"admin"`, `"manager"` or `"rep"` |
/// | `exp` | `exp` | seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: u64,
}

fn now_secs() -> u64 {
    // A clock before the epoch yields 0 and every token reads as expired.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Issues and verifies self-contained HS256 bearer tokens.
///
/// Stateless: nothing is looked up server-side on verification, so a token
/// stays valid for its whole window even if the user is later changed.
#[derive(Clone)]
pub struct Authenticator {
    secret: Arc<str>,
}

impl Authenticator {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign a token for `caller`. Returns the token and its expiry timestamp.
    pub fn issue(&self, caller: &Caller) -> Result<(String, u64), AuthError> {
        let exp = now_secs() + ACCESS_TOKEN_EXP;
        let claims = JwtClaims {
            sub: caller.id.to_string(),
            email: caller.email.clone(),
            role: caller.role,
            exp,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))?;
        Ok((token, exp))
    }

    /// Validate a token and return the identity it carries.
    ///
    /// Validation: HS256, exp checked with the library's default 60s leeway,
    /// required claims `exp` + `sub`.
    pub fn verify(&self, token: &str) -> Result<TokenInfo, AuthError> {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::Malformed,
        })?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(AuthError::Malformed);
        }
        Ok(TokenInfo {
            caller: Caller {
                id: UserId(claims.sub),
                email: claims.email,
                role: claims.role,
            },
            exp: claims.exp,
        })
    }
}
