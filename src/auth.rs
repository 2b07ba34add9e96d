// src/auth.rs
//! Admin bearer token held in the key-value store

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::gateway::EmployeeGateway;
use crate::core::store::KeyValueStore;
use crate::error::{DirectoryError, DirectoryResult};

pub const AUTH_TOKEN_KEY: &str = "agn_auth_token";

#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current token, if any. Unreadable storage counts as logged out.
    pub fn token(&self) -> Option<String> {
        match self.store.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read auth token: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub async fn login(
        &self,
        gateway: &dyn EmployeeGateway,
        username: &str,
        password: &str,
    ) -> DirectoryResult<()> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DirectoryError::Validation(
                "Username and password are required".into(),
            ));
        }

        let token = gateway.admin_login(username.trim(), password).await?;
        self.store
            .set(AUTH_TOKEN_KEY, &token)
            .map_err(|e| DirectoryError::Validation(format!("Failed to save token: {}", e)))?;

        info!("Admin {} logged in", username.trim());
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        info!("Admin token cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::directory::testing::FakeGateway;

    #[tokio::test]
    async fn test_login_saves_token_and_logout_clears() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let gateway = FakeGateway::new();
        assert!(!tokens.is_authenticated());

        tokens.login(&gateway, "admin", "secret").await.unwrap();
        assert_eq!(tokens.token().as_deref(), Some("token-admin"));

        tokens.logout().unwrap();
        assert_eq!(tokens.token(), None);
    }

    #[tokio::test]
    async fn test_login_validation_and_rejection() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let gateway = FakeGateway::new();

        let err = tokens.login(&gateway, " ", "secret").await.unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));
        assert!(gateway.calls().is_empty());

        let err = tokens.login(&gateway, "admin", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!tokens.is_authenticated());
    }
}
