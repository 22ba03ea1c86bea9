//! File-backed token store.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{AuthError, Result};
use crate::providers::token_store::TokenStore;
use crate::state::Token;

/// Token store persisting one token in a file.
///
/// The file plays the role of origin-scoped browser storage: a fixed
/// location owned by this application, surviving restarts, holding exactly
/// one opaque value.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by `path`.
    ///
    /// The file (and its parent directory) is created lazily on the first
    /// `save`; a missing file reads as "no token".
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn storage_error(e: &io::Error) -> AuthError {
    AuthError::Storage {
        message: e.to_string(),
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error(&e))?;
        }
        fs::write(&self.path, token.as_str()).map_err(|e| storage_error(&e))
    }

    fn load(&self) -> Result<Option<Token>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Token::new(trimmed)))
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&e)),
        }
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&e)),
        }
    }
}
