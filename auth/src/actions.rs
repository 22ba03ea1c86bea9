//! Authentication actions.
//!
//! One closed union covers every input to the auth store, following the
//! command/event split: **commands** express user or shell intent,
//! **events** report the outcome of asynchronous effects. Events carry
//! everything the reducer needs; there are no overloaded callbacks and no
//! sentinel values.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::state::{AttemptId, AuthMode, Identity, LoginSurface, NavigationIntent, Role, Token};
use crate::validate::CredentialForm;

/// Input to the auth store.
///
/// The session reducer and the login-flow reducer each handle their own
/// subset and ignore the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Session Lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    /// Start the one-time session bootstrap. Dispatched by the application
    /// shell exactly once, at startup.
    ///
    /// # Flow
    ///
    /// 1. Read the stored token; absent → `Unauthenticated`, done
    /// 2. Present → verify remotely while the session stays `Initializing`
    /// 3. The outcome arrives as [`BootstrapVerified`](Self::BootstrapVerified)
    ///    or [`BootstrapFailed`](Self::BootstrapFailed)
    Bootstrap,

    /// The stored token verified successfully.
    ///
    /// This is an **event** produced by the bootstrap effect.
    BootstrapVerified {
        /// The identity the token proves.
        identity: Identity,
    },

    /// The stored token failed verification.
    ///
    /// This is an **event** produced by the bootstrap effect. Handled
    /// silently: the token is cleared and the session downgrades.
    BootstrapFailed {
        /// Why verification failed.
        error: AuthError,
    },

    /// Adopt `identity` as the authenticated session.
    ///
    /// Dispatched by the login flow after it has persisted the token and
    /// confirmed the role. Never performs network I/O.
    SessionEstablished {
        /// The freshly authenticated identity.
        identity: Identity,
    },

    /// Tear the session down: best-effort remote revocation, clear the
    /// stored token, go `Unauthenticated` — unconditionally.
    Logout,

    /// The remote logout call finished.
    ///
    /// This is an **event** produced by the logout effect; confirmation
    /// only, local teardown has already happened.
    LogoutAcknowledged {
        /// Whether the identity service confirmed the revocation.
        delivered: bool,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Login Flow
    // ═══════════════════════════════════════════════════════════════════════
    /// Start (or restart) the login flow from one of the two entry points.
    BeginLogin {
        /// Which entry point the user arrived at.
        surface: LoginSurface,

        /// The path to restore after a successful login, when a guard
        /// captured one.
        intent: Option<NavigationIntent>,
    },

    /// The user picked a role on the role-gated surface.
    RoleChosen {
        /// The selected role.
        role: Role,
    },

    /// The user toggled between login and registration.
    ///
    /// Ignored when the selected role does not permit registration — the
    /// admin surface is login-only for the whole attempt.
    SwitchMode {
        /// The requested mode.
        mode: AuthMode,
    },

    /// The user submitted the credential form.
    ///
    /// Validation runs first; failures are field-scoped and no network call
    /// is made. Valid input produces a login or register effect per the
    /// selected mode.
    SubmitCredentials {
        /// Raw form input.
        form: CredentialForm,
    },

    /// The identity service authenticated the submission.
    ///
    /// This is an **event** produced by the submit effect. The reducer
    /// cross-checks the returned role against the selection before any
    /// state or persistence changes happen.
    AuthSucceeded {
        /// Which submission this answers.
        attempt: AttemptId,

        /// The issued credential token.
        token: Token,

        /// The authenticated identity.
        identity: Identity,
    },

    /// The identity service rejected the submission (or was unreachable).
    ///
    /// This is an **event** produced by the submit effect.
    AuthFailed {
        /// Which submission this answers.
        attempt: AttemptId,

        /// Why the submission failed.
        error: AuthError,
    },
}
