//! The application-root auth service.
//!
//! [`AuthService`] is the explicitly constructed session singleton: built
//! once at application start, injected by reference wherever session state
//! is read, torn down only at application exit. There is no module-level
//! mutable state anywhere in this crate.

use std::time::Duration;

use vestibule_core::composition::{CombinedReducer, combine_reducers};
use vestibule_runtime::{EffectHandle, Store, StoreError};

use crate::actions::AuthAction;
use crate::config::{AuthConfig, RoutePlan};
use crate::environment::AuthEnvironment;
use crate::guards::{GuardDecision, GuardPolicy};
use crate::providers::{IdentityGateway, TokenStore};
use crate::reducers::{LoginFlowReducer, SessionReducer};
use crate::state::{AuthState, LoginFlowState, SessionState};

/// The store type backing the auth service.
pub type AuthStore<G, T> = Store<
    AuthState,
    AuthAction,
    AuthEnvironment<G, T>,
    CombinedReducer<AuthState, AuthAction, AuthEnvironment<G, T>>,
>;

/// Process-wide session service.
///
/// Wraps one [`Store`] driving the session and login-flow reducers over the
/// shared [`AuthState`]. Cloning shares the underlying store, so handing
/// clones to route guards and forms keeps everyone reading (and the
/// reducers writing) the same session.
pub struct AuthService<G, T>
where
    G: IdentityGateway + Clone + 'static,
    T: TokenStore + Clone + 'static,
{
    store: AuthStore<G, T>,
    routes: RoutePlan,
}

impl<G, T> Clone for AuthService<G, T>
where
    G: IdentityGateway + Clone + 'static,
    T: TokenStore + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            routes: self.routes.clone(),
        }
    }
}

impl<G, T> AuthService<G, T>
where
    G: IdentityGateway + Clone + 'static,
    T: TokenStore + Clone + 'static,
{
    /// Build the service from configuration and providers.
    ///
    /// The session starts `Initializing`; call [`bootstrap`](Self::bootstrap)
    /// once to run the startup verification.
    #[must_use]
    pub fn new(config: AuthConfig, gateway: G, tokens: T) -> Self {
        let routes = config.routes.clone();
        let session: SessionReducer<G, T> = SessionReducer::new();
        let login: LoginFlowReducer<G, T> = LoginFlowReducer::new(config.routes);
        let reducer = combine_reducers(vec![Box::new(session), Box::new(login)]);
        let store = Store::new(
            AuthState::default(),
            reducer,
            AuthEnvironment::new(gateway, tokens),
        );

        Self { store, routes }
    }

    /// Run the one-time startup transition: load the stored token and, if
    /// present, verify it against the identity service.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the service has been
    /// shut down.
    pub async fn bootstrap(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(AuthAction::Bootstrap).await
    }

    /// Dispatch an action.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the service has been
    /// shut down.
    pub async fn send(&self, action: AuthAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Dispatch an action and wait for a matching effect-produced action.
    ///
    /// # Errors
    ///
    /// See [`Store::send_and_wait_for`].
    pub async fn send_and_wait_for<F>(
        &self,
        action: AuthAction,
        predicate: F,
        timeout: Duration,
    ) -> Result<AuthAction, StoreError>
    where
        F: Fn(&AuthAction) -> bool,
    {
        self.store.send_and_wait_for(action, predicate, timeout).await
    }

    /// Tear the session down (logout).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the service has been
    /// shut down.
    pub async fn logout(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(AuthAction::Logout).await
    }

    /// The current session record.
    pub async fn session(&self) -> SessionState {
        self.store.state(|s| s.session.clone()).await
    }

    /// The current login-flow state.
    pub async fn flow(&self) -> LoginFlowState {
        self.store.state(|s| s.flow.clone()).await
    }

    /// `true` when a verified identity is present.
    pub async fn is_authenticated(&self) -> bool {
        self.store.state(|s| s.session.is_authenticated()).await
    }

    /// `true` while the startup verification has not resolved.
    pub async fn is_initializing(&self) -> bool {
        self.store.state(|s| s.session.is_initializing()).await
    }

    /// Evaluate a guard policy for a navigation to `requested_path`.
    pub async fn guard(&self, policy: GuardPolicy, requested_path: &str) -> GuardDecision {
        let session = self.session().await;
        policy.evaluate(&session, requested_path, &self.routes)
    }

    /// Observe the actions produced by effects (authentication outcomes,
    /// logout confirmations). Intended for application shells reacting to
    /// navigation-relevant events.
    #[must_use]
    pub fn subscribe_actions(&self) -> tokio::sync::broadcast::Receiver<AuthAction> {
        self.store.subscribe_actions()
    }

    /// The configured redirect targets.
    #[must_use]
    pub const fn routes(&self) -> &RoutePlan {
        &self.routes
    }

    /// Tear the service down at application exit.
    ///
    /// After this call new actions are rejected and in-flight effect results
    /// (including a pending startup verification) are dropped instead of
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
