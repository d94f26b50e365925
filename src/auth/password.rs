//! Argon2id credential hashing.
//!
//! Hashing is CPU-bound, so request handlers go through [`hash_blocking`] and
//! [`verify_blocking`], which run on tokio's blocking pool.

use anyhow::{anyhow, Context};
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Returns the PHC string (`$argon2id$...`) for `plain` with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            anyhow!("password hashing failed: {e}")
        })
}

/// `Ok(false)` on a mismatch; `Err` only when `stored` is not a usable hash.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow!("stored password hash is malformed: {e}")
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {e}")),
    }
}

pub async fn hash_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task panicked")?
}

pub async fn verify_blocking(plain: String, stored: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
        .await
        .context("password verification task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_argon2id() {
        let first = hash_password("Secur3Passw0rd").unwrap();
        let second = hash_password("Secur3Passw0rd").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[test]
    fn mismatch_is_false_not_error() {
        let stored = hash_password("Correct1Horse").unwrap();
        assert!(verify_password("Correct1Horse", &stored).unwrap());
        assert!(!verify_password("Wrong1Horse", &stored).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[tokio::test]
    async fn blocking_pool_round_trip() {
        let stored = hash_blocking("Secret123".into()).await.unwrap();
        assert!(verify_blocking("Secret123".into(), stored.clone()).await.unwrap());
        assert!(!verify_blocking("Secret124".into(), stored).await.unwrap());
    }
}
