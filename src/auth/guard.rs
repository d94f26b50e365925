//! Access control for mutating requests.
//!
//! A request moves from unchecked to either authenticated or unauthenticated;
//! an ownership check then moves an authenticated request to authorized or
//! forbidden. Every outcome is final for the request.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No valid identity could be established.
    #[error("{0}")]
    Unauthenticated(String),
    /// Identity established but it is not the resource owner.
    #[error("not authorized")]
    Forbidden,
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AuthError::Unauthenticated("missing Authorization header".into()))?;

    let (scheme, token) = auth
        .split_once(' ')
        .ok_or_else(|| AuthError::Unauthenticated("invalid Authorization header".into()))?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::Unauthenticated("invalid auth scheme".into()));
    }
    Ok(token.trim())
}

pub fn require_authenticated(headers: &HeaderMap, keys: &JwtKeys) -> Result<Uuid, AuthError> {
    let token = bearer_token(headers)?;
    keys.verify(token).map_err(|e| {
        warn!(reason = %e, "token rejected");
        AuthError::Unauthenticated(e.to_string())
    })
}

/// Second stage of the ownership gate: identifiers are compared by value.
pub fn ensure_owner(actor: Uuid, owner: Uuid) -> Result<Uuid, AuthError> {
    if actor == owner {
        Ok(actor)
    } else {
        warn!(%actor, %owner, "ownership check failed");
        Err(AuthError::Forbidden)
    }
}

pub fn require_owner(headers: &HeaderMap, keys: &JwtKeys, owner: Uuid) -> Result<Uuid, AuthError> {
    let actor = require_authenticated(headers, keys)?;
    ensure_owner(actor, owner)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderValue;

    use super::*;
    use crate::{auth::clock::SystemClock, config::AppConfig};

    fn keys() -> JwtKeys {
        JwtKeys::new(&AppConfig::for_tests().jwt, Arc::new(SystemClock))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn owner_gate_round_trip() {
        let keys = keys();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let headers = headers_with(&format!("Bearer {}", keys.issue(a).unwrap()));

        assert_eq!(require_owner(&headers, &keys, a), Ok(a));
        assert_eq!(require_owner(&headers, &keys, b), Err(AuthError::Forbidden));
        assert!(matches!(
            require_owner(&HeaderMap::new(), &keys, a),
            Err(AuthError::Unauthenticated(_))
        ));
    }

    #[test]
    fn authenticated_accepts_lowercase_scheme() {
        let keys = keys();
        let a = Uuid::new_v4();
        let headers = headers_with(&format!("bearer {}", keys.issue(a).unwrap()));
        assert_eq!(require_authenticated(&headers, &keys), Ok(a));
    }

    #[test]
    fn authenticated_rejects_other_schemes_and_bad_tokens() {
        let keys = keys();
        for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer    ", "Bearer nonsense"] {
            let result = require_authenticated(&headers_with(value), &keys);
            assert!(
                matches!(result, Err(AuthError::Unauthenticated(_))),
                "{value:?} -> {result:?}"
            );
        }
    }

    #[test]
    fn unauthenticated_wins_over_ownership() {
        let keys = keys();
        let owner = Uuid::new_v4();
        let result = require_owner(&headers_with("Bearer nonsense"), &keys, owner);
        assert!(matches!(result, Err(AuthError::Unauthenticated(_))));
    }
}
