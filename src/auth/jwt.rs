use std::{sync::Arc, time::Duration};

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::Duration as TimeDuration;
use tracing::debug;
use uuid::Uuid;

use super::{claims::Claims, clock::Clock};
use crate::config::JwtConfig;

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token issued for another issuer or audience")]
    InvalidClaims,
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => VerifyError::InvalidSignature,
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature => VerifyError::InvalidClaims,
            _ => VerifyError::Malformed,
        }
    }
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs a token for `user_id` valid for the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    pub fn issue_with_ttl(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<String> {
        let now = self.clock.now();
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user_id, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Checks signature, issuer, audience and expiry; returns the embedded user id.
    ///
    /// `exp` is checked against the injected clock with zero leeway.
    pub fn verify(&self, token: &str) -> Result<Uuid, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        let now = self.clock.now().unix_timestamp();
        if now > data.claims.exp {
            debug!(user_id = %data.claims.sub, exp = data.claims.exp, now, "jwt expired");
            return Err(VerifyError::Expired);
        }
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::{ManualClock, SystemClock};
    use time::macros::datetime;

    fn cfg(secret: &str, issuer: &str, audience: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
        }
    }

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&cfg(secret, issuer, audience), Arc::new(SystemClock))
    }

    #[test]
    fn sign_and_verify_token() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).expect("sign");
        assert_eq!(keys.verify(&token), Ok(user_id));
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys("same-secret", "good-iss", "good-aud");
        let bad_keys = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good_keys.issue(Uuid::new_v4()).expect("sign");
        assert_eq!(bad_keys.verify(&token), Err(VerifyError::InvalidClaims));
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let ours = make_keys("our-secret", "iss", "aud");
        let theirs = make_keys("their-secret", "iss", "aud");
        let token = theirs.issue(Uuid::new_v4()).expect("sign");
        assert_eq!(ours.verify(&token), Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert_eq!(keys.verify("not-a-jwt"), Err(VerifyError::Malformed));
        assert_eq!(keys.verify(""), Err(VerifyError::Malformed));
    }

    #[test]
    fn expiry_follows_injected_clock() {
        let clock = Arc::new(ManualClock::new(datetime!(2024-06-01 12:00 UTC)));
        let keys = JwtKeys::new(&cfg("dev-secret", "iss", "aud"), clock.clone());
        let user_id = Uuid::new_v4();
        let token = keys
            .issue_with_ttl(user_id, Duration::from_secs(1))
            .expect("sign");

        assert_eq!(keys.verify(&token), Ok(user_id));

        clock.advance(TimeDuration::seconds(1));
        assert_eq!(keys.verify(&token), Ok(user_id), "exactly at exp is still valid");

        clock.advance(TimeDuration::seconds(1));
        assert_eq!(keys.verify(&token), Err(VerifyError::Expired));
    }
}
