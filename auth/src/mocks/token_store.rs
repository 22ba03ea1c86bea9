//! Mock token store for testing.

use std::sync::{Arc, Mutex};

use crate::error::{AuthError, Result};
use crate::providers::token_store::TokenStore;
use crate::state::Token;

#[derive(Debug, Default)]
struct Inner {
    token: Option<Token>,
    save_count: usize,
    clear_count: usize,
    fail_saves: bool,
}

/// In-memory token store.
#[derive(Debug, Clone, Default)]
pub struct MockTokenStore {
    inner: Arc<Mutex<Inner>>,
}

fn lock_error() -> AuthError {
    AuthError::Internal {
        message: "mutex lock failed".to_string(),
    }
}

impl MockTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `token`, as if a previous session had
    /// persisted it.
    #[must_use]
    pub fn with_token(token: Token) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.token = Some(token);
        }
        store
    }

    /// Make subsequent `save` calls fail with a storage error.
    pub fn fail_saves(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_saves = true;
        }
    }

    /// The currently stored token (for assertions).
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn stored(&self) -> Result<Option<Token>> {
        Ok(self.inner.lock().map_err(|_| lock_error())?.token.clone())
    }

    /// Number of `save` calls observed.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn save_count(&self) -> Result<usize> {
        Ok(self.inner.lock().map_err(|_| lock_error())?.save_count)
    }

    /// Number of `clear` calls observed.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn clear_count(&self) -> Result<usize> {
        Ok(self.inner.lock().map_err(|_| lock_error())?.clear_count)
    }
}

impl TokenStore for MockTokenStore {
    fn save(&self, token: &Token) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| lock_error())?;
        inner.save_count += 1;
        if inner.fail_saves {
            return Err(AuthError::Storage {
                message: "simulated save failure".to_string(),
            });
        }
        inner.token = Some(token.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Token>> {
        Ok(self.inner.lock().map_err(|_| lock_error())?.token.clone())
    }

    fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| lock_error())?;
        inner.clear_count += 1;
        inner.token = None;
        Ok(())
    }
}
