//! Error types for session and authentication operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the client-side auth core.
///
/// Every variant is non-fatal: each one resolves to a well-defined,
/// renderable state (an unauthenticated session or an error-annotated login
/// form), never an unhandled fault.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════
    /// The stored token failed verification (expired, revoked, garbage).
    ///
    /// Expected background condition at startup; handled silently.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Email/password pair rejected by the identity service.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration rejected (email taken, server-side validation). The
    /// external contract surfaces the reason as a message string, not typed
    /// subfields.
    #[error("Registration rejected: {message}")]
    Rejected {
        /// Server-provided reason.
        message: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Transport and Service Errors
    // ═══════════════════════════════════════════════════════════
    /// Transport failure: no usable response from the identity service.
    #[error("Network error: {message}")]
    Network {
        /// Transport-level description.
        message: String,
    },

    /// The identity service answered with a server failure or an
    /// uninterpretable response.
    #[error("Identity service error (status {status})")]
    Server {
        /// HTTP status code of the failed response.
        status: u16,
    },

    // ═══════════════════════════════════════════════════════════
    // Local Errors
    // ═══════════════════════════════════════════════════════════
    /// The token persistence layer failed.
    #[error("Token storage error: {message}")]
    Storage {
        /// Underlying I/O description.
        message: String,
    },

    /// Internal error (lock poisoning, client construction). Should not be
    /// exposed to users.
    #[error("Internal error: {message}")]
    Internal {
        /// Description for logs.
        message: String,
    },
}

impl AuthError {
    /// Returns `true` if this error is due to invalid user input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vestibule_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_user_error());
    /// assert!(!AuthError::Server { status: 500 }.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::Rejected { .. })
    }

    /// Returns `true` if retrying the same request could plausibly succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vestibule_auth::AuthError;
    /// assert!(AuthError::Network { message: "timeout".into() }.is_transient());
    /// assert!(!AuthError::InvalidToken.is_transient());
    /// ```
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }
}
