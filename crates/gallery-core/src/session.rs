use async_trait::async_trait;
use gallery_api::{Result, UserData};
use std::fmt;
use std::sync::Mutex;

use crate::traits::TokenStore;

/// An authenticated user, passed explicitly to whatever needs to call the
/// service on their behalf.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: Option<UserData>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<UserData>) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// User details, known only right after login
    pub fn user(&self) -> Option<&UserData> {
        self.user.as_ref()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Token store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned slot still holds a usable Option
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load_token(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    async fn clear_token(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}
