//! Session and login-flow state types.
//!
//! All types are `Clone` to support the functional architecture pattern.

use serde::{Deserialize, Serialize};

use crate::config::RoutePlan;
use crate::error::AuthError;
use crate::validate::FieldErrors;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Server-issued user identifier.
///
/// The identity service treats ids as opaque; nothing here assumes a
/// particular format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Wrap a raw id.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Correlates a credential submission with its asynchronous outcome.
///
/// Results carrying an attempt id other than the one currently in flight are
/// stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub uuid::Uuid);

impl AttemptId {
    /// Generate a new random `AttemptId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Roles
// ═══════════════════════════════════════════════════════════════════════

/// User role.
///
/// A closed set: invalid roles are unrepresentable, including in the
/// allowed-role sets handed to guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular learner account.
    Student,
    /// Mentor account.
    Mentor,
    /// Administrator account.
    Admin,
}

impl Role {
    /// Get the role name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Mentor => "mentor",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the role string is not recognized.
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "mentor" => Ok(Self::Mentor),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Unknown role: {s}")),
        }
    }

    /// The role-default landing path, used when an authenticated user lacks
    /// permission for a requested route and after login without a pending
    /// navigation intent.
    #[must_use]
    pub fn landing_path(&self, routes: &RoutePlan) -> String {
        match self {
            Self::Mentor => routes.mentor.clone(),
            _ => routes.dashboard.clone(),
        }
    }

    /// Whether this role may register a new account through the login flow.
    ///
    /// Admin accounts are provisioned out of band; the admin surface is
    /// login-only.
    #[must_use]
    pub const fn allows_registration(&self) -> bool {
        !matches!(self, Self::Admin)
    }
}

/// A set of roles, used as the allowed-set for role guards.
///
/// `Copy` bitmask over [`Role`]; constructible in `const` contexts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every role.
    pub const ALL: Self = Self::EMPTY
        .with(Role::Student)
        .with(Role::Mentor)
        .with(Role::Admin);

    const fn mask(role: Role) -> u8 {
        1 << (role as u8)
    }

    /// The set containing exactly `role`.
    #[must_use]
    pub const fn only(role: Role) -> Self {
        Self(Self::mask(role))
    }

    /// This set plus `role`.
    #[must_use]
    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | Self::mask(role))
    }

    /// `true` if `role` is a member.
    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & Self::mask(role) != 0
    }

    /// `true` if no role is a member.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut set = f.debug_set();
        for role in [Role::Student, Role::Mentor, Role::Admin] {
            if self.contains(role) {
                set.entry(&role);
            }
        }
        set.finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Identity and Token
// ═══════════════════════════════════════════════════════════════════════

/// The authenticated user.
///
/// Immutable for the life of a session; replaced wholesale on re-login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Server-issued user id.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Account role.
    pub role: Role,
}

/// Opaque credential token.
///
/// Owned by the token store and presented to the identity service to prove a
/// session. The token knows nothing about the identity it represents, and a
/// present token does not imply an authenticated session — it must be
/// re-verified on every application start.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token, for wire use (bearer headers, persistence).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs and debug output.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token(<redacted>)")
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// The client-side session record.
///
/// Exactly one exists per running application instance, created at
/// application start and owned by the
/// [`AuthService`](crate::service::AuthService). The
/// identity-present-iff-authenticated invariant is structural: only the
/// `Authenticated` variant carries an [`Identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Startup verification of a stored token is still in flight (or has not
    /// been started yet). Guards render a loading placeholder and make no
    /// navigation decision in this state.
    #[default]
    Initializing,

    /// A verified identity is present.
    Authenticated(Identity),

    /// No session. Either no token was stored, verification failed, or the
    /// user logged out.
    Unauthenticated,
}

impl SessionState {
    /// `true` when a verified identity is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// `true` while the startup verification has not resolved.
    #[must_use]
    pub const fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    /// The current identity, when authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Navigation
// ═══════════════════════════════════════════════════════════════════════

/// The path a user was trying to reach when a guard redirected them to
/// login.
///
/// Captured at redirect time, consumed exactly once by the login flow, never
/// persisted across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    /// The originally requested path.
    pub path: String,
}

impl NavigationIntent {
    /// Capture an intent for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Login Flow
// ═══════════════════════════════════════════════════════════════════════

/// Whether the credential form submits a login or a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Authenticate an existing account.
    Login,
    /// Create a new account.
    Register,
}

/// Which login entry point started the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginSurface {
    /// The regular entry point: role selection first, then credentials.
    RoleGated,
    /// The dedicated admin entry point: role selection is skipped and the
    /// flow is pinned to `admin` / login.
    AdminOnly,
}

/// The user's role selection for one login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSelection {
    /// The role the user claims.
    pub role: Role,
    /// Login or register. Pinned to login when `role` is admin.
    pub mode: AuthMode,
}

/// Where the login flow currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowPhase {
    /// No login flow is active.
    #[default]
    Idle,

    /// Waiting for the user to pick a role.
    SelectingRole,

    /// Waiting for credentials (or showing validation/failure feedback).
    EnteringCredentials,

    /// A login/register call is in flight.
    Submitting {
        /// Correlates the in-flight call with its outcome.
        attempt: AttemptId,
    },

    /// Authentication succeeded; the shell should navigate.
    Completed {
        /// The resolved navigation target.
        redirect: String,
    },
}

/// User-facing feedback banner for the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowNotice {
    /// The authenticated account's role did not match the selected role.
    AccessDenied {
        /// The role the user selected and failed to prove.
        required: Role,
    },

    /// Email/password rejected by the identity service.
    InvalidCredentials,

    /// Transport or server failure; worth retrying.
    ServiceUnavailable,

    /// Registration rejected by the identity service (email taken,
    /// server-side validation). The message comes through as an opaque
    /// string per the external contract.
    Rejected {
        /// Server-provided message.
        message: String,
    },
}

impl FlowNotice {
    /// Map a failed login/register call to its user-facing notice.
    #[must_use]
    pub fn for_failure(error: &AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials | AuthError::InvalidToken => Self::InvalidCredentials,
            AuthError::Rejected { message } => Self::Rejected {
                message: message.clone(),
            },
            _ => Self::ServiceUnavailable,
        }
    }

    /// The display message for this notice.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::AccessDenied { required } => {
                format!("Access denied: {} privileges required", required.as_str())
            },
            Self::InvalidCredentials => "invalid email or password".to_string(),
            Self::ServiceUnavailable => "something went wrong, please try again".to_string(),
            Self::Rejected { message } => message.clone(),
        }
    }
}

/// State of the login/registration flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFlowState {
    /// Which entry point started the flow (`None` until it starts).
    pub surface: Option<LoginSurface>,

    /// The role/mode the user has selected for this attempt.
    pub selection: Option<RoleSelection>,

    /// Current phase.
    pub phase: FlowPhase,

    /// Field-scoped validation errors from the last submission attempt.
    pub field_errors: FieldErrors,

    /// Flow-level feedback banner.
    pub notice: Option<FlowNotice>,

    /// Pending navigation intent to restore after a successful login.
    pub intent: Option<NavigationIntent>,
}

// ═══════════════════════════════════════════════════════════════════════
// Root State
// ═══════════════════════════════════════════════════════════════════════

/// Root state driven by the auth store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// The session record.
    pub session: SessionState,

    /// The login/registration flow.
    pub flow: LoginFlowState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_starts_initializing() {
        let state = SessionState::default();
        assert!(state.is_initializing());
        assert!(!state.is_authenticated());
        assert!(state.identity().is_none());
    }

    #[test]
    fn identity_present_iff_authenticated() {
        let identity = Identity {
            id: UserId::new("u-1"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Student,
        };
        let state = SessionState::Authenticated(identity.clone());
        assert!(state.is_authenticated());
        assert_eq!(state.identity(), Some(&identity));

        assert!(SessionState::Unauthenticated.identity().is_none());
    }

    #[test]
    fn role_wire_names_round_trip() {
        for role in [Role::Student, Role::Mentor, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()), Ok(role));
        }
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn role_serde_uses_lowercase() {
        #[allow(clippy::unwrap_used)]
        let json = serde_json::to_string(&Role::Mentor).unwrap();
        assert_eq!(json, "\"mentor\"");
    }

    #[test]
    fn role_set_membership() {
        let set = RoleSet::only(Role::Student).with(Role::Mentor);
        assert!(set.contains(Role::Student));
        assert!(set.contains(Role::Mentor));
        assert!(!set.contains(Role::Admin));
        assert!(RoleSet::EMPTY.is_empty());
        assert!(RoleSet::ALL.contains(Role::Admin));
    }

    #[test]
    fn landing_paths_follow_role_mapping() {
        let routes = RoutePlan::default();
        assert_eq!(Role::Mentor.landing_path(&routes), "/mentor");
        assert_eq!(Role::Student.landing_path(&routes), "/dashboard");
        assert_eq!(Role::Admin.landing_path(&routes), "/dashboard");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("super-secret");
        assert_eq!(format!("{token:?}"), "Token(<redacted>)");
    }

    #[test]
    fn only_admin_is_locked_to_login() {
        assert!(Role::Student.allows_registration());
        assert!(Role::Mentor.allows_registration());
        assert!(!Role::Admin.allows_registration());
    }
}
