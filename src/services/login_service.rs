use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::database::models::User;
use crate::database::store::DocumentStore;

use super::credentials::verify_password;
use super::{store_call, StoreCallError};

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown user or wrong password; callers cannot tell which
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreCallError),
}

#[derive(Clone)]
pub struct LoginService {
    store: Arc<dyn DocumentStore>,
    query_timeout: Duration,
}

impl LoginService {
    pub fn new(store: Arc<dyn DocumentStore>, query_timeout: Duration) -> Self {
        Self { store, query_timeout }
    }

    pub async fn standard_login(&self, username: &str, password: &str) -> Result<User, LoginError> {
        let user = store_call(
            "standard_login",
            self.query_timeout,
            self.store.find_user_by_username(username),
        )
        .await?;

        match user {
            Some(user) if verify_password(&user.salt, password, &user.password_hash) => {
                info!("User '{}' logged in", user.username);
                Ok(user)
            }
            _ => {
                warn!("Rejected login for '{}'", username);
                Err(LoginError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::store::AdminStore;
    use crate::services::credentials::new_user;

    async fn service_with_user() -> LoginService {
        let store = MemoryStore::new();
        store
            .insert_user(new_user("ada", "ada@example.com", "analytical"))
            .await
            .unwrap();
        LoginService::new(Arc::new(store), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_login_returns_user() {
        let svc = service_with_user().await;
        let user = svc.standard_login("ada", "analytical").await.unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let svc = service_with_user().await;
        assert!(matches!(
            svc.standard_login("ada", "difference-engine").await,
            Err(LoginError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.standard_login("charles", "analytical").await,
            Err(LoginError::InvalidCredentials)
        ));
    }
}
