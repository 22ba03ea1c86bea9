//! Authentication configuration.
//!
//! Configuration values are provided by the application shell at startup,
//! not hardcoded in reducers or guards.

use std::time::Duration;

/// The application's navigation surface, as consumed and produced by guards
/// and the login flow. Paths are redirect targets only; the views behind
/// them are not this crate's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    /// Regular login entry point.
    pub login: String,

    /// Dedicated admin login entry point.
    pub admin_login: String,

    /// Application root; target of admin-guard denials.
    pub root: String,

    /// Default landing path after login.
    pub dashboard: String,

    /// Mentor landing path.
    pub mentor: String,

    /// Admin landing path.
    pub admin: String,
}

impl Default for RoutePlan {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            admin_login: "/admin/login".to_string(),
            root: "/".to_string(),
            dashboard: "/dashboard".to_string(),
            mentor: "/mentor".to_string(),
            admin: "/admin".to_string(),
        }
    }
}

/// Top-level configuration for the auth core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the identity service (e.g. `https://api.example.com`).
    pub service_url: String,

    /// Transport-level request timeout. The core itself defines no timeout
    /// policy; this is handed to the HTTP client.
    pub request_timeout: Duration,

    /// Redirect targets.
    pub routes: RoutePlan,
}

impl AuthConfig {
    /// Create a configuration pointing at `service_url`.
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            request_timeout: Duration::from_secs(10),
            routes: RoutePlan::default(),
        }
    }

    /// Set the transport request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the redirect targets.
    #[must_use]
    pub fn with_routes(mut self, routes: RoutePlan) -> Self {
        self.routes = routes;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
