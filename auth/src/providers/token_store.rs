//! Token store trait.

use crate::error::Result;
use crate::state::Token;

/// Durable persistence for one opaque credential token.
///
/// The store holds at most one token under a fixed key, scoped to this
/// application. Contents are never inspected or validated — the token is an
/// opaque blob that only the identity service can interpret.
///
/// # Implementation Notes
///
/// - All operations are synchronous and idempotent.
/// - The token survives application restarts; it is removed only by
///   `clear()` (logout or failed startup verification).
pub trait TokenStore: Send + Sync {
    /// Persist `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`](crate::error::AuthError::Storage) if
    /// the persistence layer fails.
    fn save(&self, token: &Token) -> Result<()>;

    /// The persisted token, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`](crate::error::AuthError::Storage) if
    /// the persistence layer fails.
    fn load(&self) -> Result<Option<Token>>;

    /// Remove the persisted token. Succeeds when no token exists.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`](crate::error::AuthError::Storage) if
    /// the persistence layer fails.
    fn clear(&self) -> Result<()>;
}
