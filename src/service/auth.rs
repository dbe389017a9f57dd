use crate::db::InventoryStorage;
use crate::error::StockError;
use crate::middleware::session::SessionIdentity;
use crate::service::password;
use tracing::{info, warn};

/// Credential check against the `users` table.
#[derive(Clone)]
pub struct AuthService {
    storage: InventoryStorage,
}

impl AuthService {
    pub fn new(storage: InventoryStorage) -> Self {
        Self { storage }
    }

    /// Verify `username`/`password` and return the identity to store in the
    /// session. Unknown users and wrong passwords fail identically.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionIdentity, StockError> {
        if username.is_empty() || password.is_empty() {
            return Err(StockError::Validation(
                "Please enter both username and password".to_string(),
            ));
        }

        let Some(user) = self.storage.find_user_by_username(username).await? else {
            password::verify_decoy(password.to_string()).await?;
            warn!(username, "login rejected");
            return Err(StockError::InvalidCredentials);
        };

        let ok = password::verify_blocking(password.to_string(), user.password_hash).await?;
        if !ok {
            warn!(username, "login rejected");
            return Err(StockError::InvalidCredentials);
        }

        info!(user_id = user.id, username = %user.username, "login succeeded");
        Ok(SessionIdentity {
            user_id: user.id,
            username: user.username,
        })
    }

    /// Hash `password` and insert a new account. Used by provisioning only.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<i64, StockError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(StockError::Validation(
                "username and password must not be empty".to_string(),
            ));
        }
        if self.storage.find_user_by_username(username).await?.is_some() {
            return Err(StockError::Validation(format!(
                "user `{username}` already exists"
            )));
        }
        let hash = password::hash_blocking(password.to_string()).await?;
        self.storage.insert_user(username, &hash).await
    }
}
