//! Identity gateway trait.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::{Identity, Token};

/// A freshly issued credential: the token to persist plus the identity it
/// proves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Opaque credential token.
    pub token: Token,

    /// The authenticated identity.
    pub identity: Identity,
}

/// Stateless client for the remote identity service.
///
/// Every method is a single request/response exchange; no retries are
/// performed internally — callers decide. Errors never cross this boundary
/// as panics or exceptions, only as
/// [`AuthError`](crate::error::AuthError) values.
pub trait IdentityGateway: Send + Sync {
    /// Verify a stored token and return the identity it proves.
    ///
    /// # Errors
    ///
    /// - `InvalidToken`: the service rejected the token (expired, revoked)
    /// - `Network`: transport failure, no usable response
    /// - `Server`: the service failed or answered unintelligibly
    fn verify(&self, token: &Token) -> impl std::future::Future<Output = Result<Identity>> + Send;

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// As [`verify`](Self::verify), plus `InvalidCredentials`.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Grant>> + Send;

    /// Create an account and authenticate as it.
    ///
    /// # Errors
    ///
    /// As [`verify`](Self::verify), plus `Rejected` carrying the service's
    /// message (email taken, server-side validation).
    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Grant>> + Send;

    /// Revoke a token server-side. Best-effort: callers ignore the outcome
    /// and proceed with local teardown regardless.
    ///
    /// # Errors
    ///
    /// - `Network` / `Server` when revocation could not be confirmed
    fn logout(&self, token: &Token) -> impl std::future::Future<Output = Result<()>> + Send;
}
