//! Admin session persisted between invocations.
//!
//! `LoggedOut --login--> LoggedIn(token) --401--> LoggedOut`. The server
//! enforces token expiry; nothing is refreshed client side.

use crate::store::{LocalStorage, StoreResult, TOKEN_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    storage: LocalStorage,
}

impl Session {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub async fn state(&self) -> StoreResult<SessionState> {
        Ok(match self.token().await? {
            Some(token) => SessionState::LoggedIn(token),
            None => SessionState::LoggedOut,
        })
    }

    pub async fn token(&self) -> StoreResult<Option<String>> {
        let token = self.storage.get(TOKEN_KEY).await?;
        Ok(token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    pub async fn log_in(&self, token: &str) -> StoreResult<()> {
        self.storage.set(TOKEN_KEY, token).await?;
        Ok(())
    }

    pub async fn log_out(&self) -> StoreResult<()> {
        self.storage.remove(TOKEN_KEY).await?;
        Ok(())
    }
}
