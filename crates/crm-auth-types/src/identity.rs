//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use crm_domain::user::Caller;

use crate::token::Authenticator;

/// Caller identity taken from an `Authorization: Bearer <token>` header.
///
/// Returns 401 if the header is absent, not a bearer credential, or the token
/// fails validation (bad signature, expired, malformed). Role and ownership
/// enforcement (403) happens in the use cases after extraction.
#[derive(Debug, Clone)]
pub struct BearerIdentity(pub Caller);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Resolve synchronously and hand back a 'static future; `async fn` here
    // would capture the `parts` borrow and not match axum-core's signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let authenticator = Authenticator::from_ref(state);
        let result = match bearer_token(parts) {
            Some(token) => authenticator.verify(token).map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                StatusCode::UNAUTHORIZED
            }),
            None => Err(StatusCode::UNAUTHORIZED),
        };

        async move { result.map(|info| Self(info.caller)) }
    }
}
