//! Auth reducers.
//!
//! Two reducers share the root [`AuthState`](crate::state::AuthState) and
//! action type, combined into one store by the service:
//!
//! - [`SessionReducer`] — session lifecycle: startup bootstrap, session
//!   establishment, logout teardown. The single writer of the session
//!   record.
//! - [`LoginFlowReducer`] — the role-gated login/registration flow. Writes
//!   the session only indirectly, by dispatching `SessionEstablished` after
//!   a successful, role-checked authentication.
//!
//! Each reducer ignores the other's actions.

pub mod login;
pub mod session;

pub use login::LoginFlowReducer;
pub use session::SessionReducer;
