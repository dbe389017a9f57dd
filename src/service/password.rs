//! Salted one-way password hashing (argon2id, PHC string format).

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tokio::sync::OnceCell;

use crate::error::StockError;

/// Stand-in hash verified when the username is unknown, so a miss costs
/// the same argon2 work as a wrong password. Built on first use.
static DECOY_HASH: OnceCell<String> = OnceCell::const_new();

/// Hash `password` with a fresh random salt.
pub fn hash(password: &str) -> Result<String, StockError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Constant-time check of `password` against a stored PHC string.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify(password: &str, stored: &str) -> Result<bool, StockError> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// [`hash`] on the blocking pool; argon2 is deliberately slow.
pub async fn hash_blocking(password: String) -> Result<String, StockError> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .map_err(|e| StockError::Blocking(e.to_string()))?
}

/// [`verify`] on the blocking pool.
pub async fn verify_blocking(password: String, stored: String) -> Result<bool, StockError> {
    tokio::task::spawn_blocking(move || verify(&password, &stored))
        .await
        .map_err(|e| StockError::Blocking(e.to_string()))?
}

/// Spend one full verification on the decoy hash. Always a mismatch.
pub async fn verify_decoy(password: String) -> Result<bool, StockError> {
    let decoy = DECOY_HASH
        .get_or_try_init(|| hash_blocking("stockroom-decoy".to_string()))
        .await?;
    verify_blocking(password, decoy.clone()).await?;
    Ok(false)
}
