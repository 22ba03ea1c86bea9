//! # Vestibule Auth
//!
//! Client-side session lifecycle and role-based access control for a
//! single-page application.
//!
//! This crate owns the one subsystem of the application with real
//! state-machine semantics: bootstrapping a session from a persisted
//! credential token, the role-gated login/registration flow, logout
//! teardown, and the navigation guards that gate views by authentication
//! status and role.
//!
//! ## Architecture
//!
//! Everything is implemented as reducers and effects over a single root
//! state:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! - [`state::SessionState`] is the tri-state session record
//!   (initializing / authenticated / unauthenticated).
//! - [`reducers::SessionReducer`] runs the session lifecycle; the startup
//!   verification is its only automatic transition.
//! - [`reducers::LoginFlowReducer`] orchestrates role selection, credential
//!   validation, submission, and the post-authentication role cross-check.
//! - [`guards::GuardPolicy`] turns the current session into a navigation
//!   decision for a requested path.
//! - [`service::AuthService`] bundles both reducers into one store — the
//!   explicitly constructed, application-root-owned session service.
//!
//! The remote identity service and the token persistence layer are injected
//! through the [`providers`] traits; production implementations
//! ([`providers::HttpIdentityGateway`], [`providers::FileTokenStore`]) sit
//! beside them, and in-memory mocks live in [`mocks`].
//!
//! ## Example: login happy path
//!
//! ```rust,ignore
//! use vestibule_auth::*;
//!
//! let service = AuthService::new(config, gateway, tokens);
//! service.bootstrap().await?;
//!
//! service.send(AuthAction::BeginLogin {
//!     surface: LoginSurface::RoleGated,
//!     intent: None,
//! }).await?;
//! service.send(AuthAction::RoleChosen { role: Role::Student }).await?;
//! let handle = service.send(AuthAction::SubmitCredentials { form }).await?;
//! handle.wait().await?;
//!
//! assert!(service.is_authenticated().await);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod guards;
pub mod providers;
pub mod reducers;
pub mod service;
pub mod state;
pub mod validate;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::AuthAction;
pub use config::{AuthConfig, RoutePlan};
pub use error::{AuthError, Result};
pub use guards::{DenialNotice, GuardDecision, GuardPolicy};
pub use service::AuthService;
pub use state::{
    AttemptId, AuthMode, AuthState, Identity, LoginSurface, Role, RoleSet, SessionState, Token,
    UserId,
};
