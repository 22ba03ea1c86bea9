//! Navigation-time access policies.
//!
//! A guard turns the current [`SessionState`] and a requested path into a
//! [`GuardDecision`]. Guards are pure: they read session state and produce a
//! decision; navigating, rendering placeholders, and showing denial notices
//! are the shell's job.
//!
//! The prelude ordering is fixed: initialization is checked first (no
//! navigation decision may be made — or flashed — before the startup
//! verification resolves), then authentication, then role. A
//! non-authenticated user is never shown a role denial, only a login
//! redirect.

use crate::config::RoutePlan;
use crate::state::{NavigationIntent, Role, RoleSet, SessionState};

/// Access policy for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Any authenticated identity may pass.
    RequireAuthenticated,

    /// Only identities whose role is in the allowed set may pass.
    RequireRole(RoleSet),

    /// Only administrators may pass.
    RequireAdmin,
}

/// Why an authenticated user was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialNotice {
    /// The route is restricted to administrators.
    AdminOnly,
}

impl DenialNotice {
    /// The display message for this notice.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AdminOnly => "Access denied: admin privileges required",
        }
    }
}

/// The outcome of evaluating a guard for a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Startup verification is still in flight: render a loading
    /// placeholder, decide nothing.
    Loading,

    /// Render the requested view.
    Allow,

    /// Not authenticated: go to the login entry point, carrying the
    /// requested path so it can be restored after login.
    RedirectToLogin {
        /// The path the user was trying to reach.
        intent: NavigationIntent,
    },

    /// Authenticated but not permitted here: go to `path`.
    Redirect {
        /// Redirect target (role-default landing path, or the application
        /// root for admin denials).
        path: String,
        /// Denial notice to surface, if any.
        notice: Option<DenialNotice>,
    },
}

impl GuardPolicy {
    /// Evaluate this policy for a navigation to `requested_path`.
    #[must_use]
    pub fn evaluate(
        &self,
        session: &SessionState,
        requested_path: &str,
        routes: &RoutePlan,
    ) -> GuardDecision {
        // Shared prelude, in fixed order.
        if session.is_initializing() {
            return GuardDecision::Loading;
        }
        let Some(identity) = session.identity() else {
            return GuardDecision::RedirectToLogin {
                intent: NavigationIntent::new(requested_path),
            };
        };

        match self {
            Self::RequireAuthenticated => GuardDecision::Allow,
            Self::RequireRole(allowed) => {
                if allowed.contains(identity.role) {
                    GuardDecision::Allow
                } else {
                    tracing::debug!(
                        role = identity.role.as_str(),
                        path = requested_path,
                        "role not allowed, redirecting to landing path"
                    );
                    GuardDecision::Redirect {
                        path: identity.role.landing_path(routes),
                        notice: None,
                    }
                }
            },
            Self::RequireAdmin => {
                if identity.role == Role::Admin {
                    GuardDecision::Allow
                } else {
                    tracing::debug!(
                        role = identity.role.as_str(),
                        path = requested_path,
                        "admin route denied"
                    );
                    GuardDecision::Redirect {
                        path: routes.root.clone(),
                        notice: Some(DenialNotice::AdminOnly),
                    }
                }
            },
        }
    }
}
