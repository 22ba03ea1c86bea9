//! Session lifecycle reducer.
//!
//! Owns the tri-state session record:
//!
//! 1. **Bootstrap** (once, at application start): read the stored token.
//!    Absent → `Unauthenticated` with no network call. Present → verify it
//!    remotely; success restores the session, any failure clears the token
//!    and downgrades silently.
//! 2. **`SessionEstablished`**: the login flow's mutator. Any state →
//!    `Authenticated`. Never touches the network; token persistence is the
//!    login flow's responsibility and has already happened.
//! 3. **Logout**: fire a best-effort remote revocation, clear the stored
//!    token, and go `Unauthenticated` — unconditionally, even if the remote
//!    call fails or times out.
//!
//! Verification results are applied only while the session is still
//! `Initializing`. A result that arrives after the state has moved on (user
//! logged in manually first, store torn down) is stale and dropped.

use std::marker::PhantomData;

use vestibule_core::{Effect, Effects, Reducer, smallvec};

use crate::actions::AuthAction;
use crate::environment::AuthEnvironment;
use crate::providers::{IdentityGateway, TokenStore};
use crate::state::{AuthState, SessionState};

/// Session lifecycle reducer.
#[derive(Debug, Clone)]
pub struct SessionReducer<G, T> {
    _phantom: PhantomData<fn() -> (G, T)>,
}

impl<G, T> SessionReducer<G, T> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<G, T> Default for SessionReducer<G, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, T> Reducer for SessionReducer<G, T>
where
    G: IdentityGateway + Clone + 'static,
    T: TokenStore + Clone + 'static,
{
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment<G, T>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Bootstrap: the only automatic transition, run once at startup
            // ═══════════════════════════════════════════════════════════════
            AuthAction::Bootstrap => {
                if !state.session.is_initializing() {
                    tracing::warn!("bootstrap dispatched more than once, ignoring");
                    return smallvec![];
                }

                let token = match env.tokens.load() {
                    Ok(Some(token)) => token,
                    Ok(None) => {
                        // No token means no session; never verify without one.
                        state.session = SessionState::Unauthenticated;
                        return smallvec![];
                    },
                    Err(error) => {
                        tracing::warn!(%error, "token load failed, treating as absent");
                        state.session = SessionState::Unauthenticated;
                        return smallvec![];
                    },
                };

                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    match gateway.verify(&token).await {
                        Ok(identity) => Some(AuthAction::BootstrapVerified { identity }),
                        Err(error) => Some(AuthAction::BootstrapFailed { error }),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════════
            // Bootstrap outcomes: applied only while still Initializing
            // ═══════════════════════════════════════════════════════════════
            AuthAction::BootstrapVerified { identity } => {
                if !state.session.is_initializing() {
                    tracing::debug!("dropping stale verification result");
                    return smallvec![];
                }
                tracing::info!(
                    role = identity.role.as_str(),
                    "session restored from stored token"
                );
                state.session = SessionState::Authenticated(identity);
                smallvec![]
            },

            AuthAction::BootstrapFailed { error } => {
                if !state.session.is_initializing() {
                    tracing::debug!("dropping stale verification failure");
                    return smallvec![];
                }
                // Expected background correction (expired session): clear the
                // token and downgrade without surfacing an error to the user.
                tracing::info!(%error, "stored token failed verification, clearing");
                if let Err(error) = env.tokens.clear() {
                    tracing::warn!(%error, "failed to clear stored token");
                }
                state.session = SessionState::Unauthenticated;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // SessionEstablished: the login flow's mutator
            // ═══════════════════════════════════════════════════════════════
            AuthAction::SessionEstablished { identity } => {
                tracing::info!(role = identity.role.as_str(), "session established");
                state.session = SessionState::Authenticated(identity);
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Logout: local teardown is unconditional
            // ═══════════════════════════════════════════════════════════════
            AuthAction::Logout => {
                let token = env.tokens.load().ok().flatten();

                if let Err(error) = env.tokens.clear() {
                    tracing::warn!(%error, "failed to clear stored token on logout");
                }
                state.session = SessionState::Unauthenticated;

                match token {
                    Some(token) => {
                        let gateway = env.gateway.clone();
                        smallvec![Effect::future(async move {
                            let delivered = gateway.logout(&token).await.is_ok();
                            if !delivered {
                                tracing::debug!(
                                    "remote logout failed, local teardown already done"
                                );
                            }
                            Some(AuthAction::LogoutAcknowledged { delivered })
                        })]
                    },
                    None => smallvec![],
                }
            },

            AuthAction::LogoutAcknowledged { delivered } => {
                // Confirmation event only.
                if !delivered {
                    tracing::debug!("remote session may still exist after logout");
                }
                smallvec![]
            },

            // Login-flow actions are not ours.
            _ => smallvec![],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::{MockIdentityGateway, MockTokenStore};
    use crate::state::{Identity, Role, Token, UserId};
    use vestibule_testing::{ReducerTest, assertions};

    type TestReducer = SessionReducer<MockIdentityGateway, MockTokenStore>;
    type TestEnv = AuthEnvironment<MockIdentityGateway, MockTokenStore>;

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new("u-1"),
            name: "Test User".to_string(),
            email: "user@example.com".to_string(),
            role,
        }
    }

    fn env_with_token(token: Option<Token>) -> TestEnv {
        let tokens = match token {
            Some(token) => MockTokenStore::with_token(token),
            None => MockTokenStore::new(),
        };
        AuthEnvironment::new(MockIdentityGateway::new(), tokens)
    }

    #[test]
    fn bootstrap_without_token_goes_straight_to_unauthenticated() {
        ReducerTest::new(TestReducer::new())
            .with_env(env_with_token(None))
            .given_state(AuthState::default())
            .when_action(AuthAction::Bootstrap)
            .then_state(|state| {
                assert_eq!(state.session, SessionState::Unauthenticated);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn bootstrap_with_token_stays_initializing_and_verifies() {
        ReducerTest::new(TestReducer::new())
            .with_env(env_with_token(Some(Token::new("tok"))))
            .given_state(AuthState::default())
            .when_action(AuthAction::Bootstrap)
            .then_state(|state| {
                assert!(state.session.is_initializing());
            })
            .then_effects(|effects| assertions::assert_effect_count(effects, 1))
            .run();
    }

    #[test]
    fn verified_bootstrap_authenticates() {
        ReducerTest::new(TestReducer::new())
            .with_env(env_with_token(Some(Token::new("tok"))))
            .given_state(AuthState::default())
            .when_action(AuthAction::BootstrapVerified {
                identity: identity(Role::Mentor),
            })
            .then_state(|state| {
                assert!(state.session.is_authenticated());
                assert_eq!(state.session.identity().unwrap().role, Role::Mentor);
            })
            .run();
    }

    #[test]
    fn failed_bootstrap_clears_token_and_downgrades() {
        let env = env_with_token(Some(Token::new("stale")));
        let tokens = env.tokens.clone();

        ReducerTest::new(TestReducer::new())
            .with_env(env)
            .given_state(AuthState::default())
            .when_action(AuthAction::BootstrapFailed {
                error: crate::error::AuthError::InvalidToken,
            })
            .then_state(|state| {
                assert_eq!(state.session, SessionState::Unauthenticated);
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(tokens.stored().unwrap(), None);
    }

    #[test]
    fn stale_verification_result_is_dropped_after_login() {
        // The user logged in manually before the startup verification
        // resolved; the late result must not clobber the fresher session.
        let fresh = identity(Role::Student);
        let stale = identity(Role::Mentor);

        let state = AuthState {
            session: SessionState::Authenticated(fresh.clone()),
            ..AuthState::default()
        };

        ReducerTest::new(TestReducer::new())
            .with_env(env_with_token(None))
            .given_state(state)
            .when_action(AuthAction::BootstrapVerified { identity: stale })
            .then_state(move |state| {
                assert_eq!(state.session.identity(), Some(&fresh));
            })
            .run();
    }

    #[test]
    fn logout_clears_token_and_unauthenticates() {
        let env = env_with_token(Some(Token::new("tok")));
        let tokens = env.tokens.clone();

        let state = AuthState {
            session: SessionState::Authenticated(identity(Role::Student)),
            ..AuthState::default()
        };

        ReducerTest::new(TestReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(AuthAction::Logout)
            .then_state(|state| {
                assert_eq!(state.session, SessionState::Unauthenticated);
            })
            .then_effects(|effects| assertions::assert_effect_count(effects, 1))
            .run();

        assert_eq!(tokens.stored().unwrap(), None);
    }

    #[test]
    fn logout_without_stored_token_skips_the_remote_call() {
        let state = AuthState {
            session: SessionState::Authenticated(identity(Role::Student)),
            ..AuthState::default()
        };

        ReducerTest::new(TestReducer::new())
            .with_env(env_with_token(None))
            .given_state(state)
            .when_action(AuthAction::Logout)
            .then_state(|state| {
                assert_eq!(state.session, SessionState::Unauthenticated);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
