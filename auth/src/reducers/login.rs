//! Login/registration flow reducer.
//!
//! Orchestrates the two-phase gate in front of the identity service:
//!
//! 1. **Role selection.** The role-gated surface asks the user to pick a
//!    role; picking admin pins the mode to login for the rest of the
//!    attempt. The dedicated admin surface skips this phase entirely with a
//!    hardcoded admin/login selection.
//! 2. **Credential form.** Client-side validation gates the network call;
//!    failures are field-scoped and nothing is submitted. On success the
//!    server-reported role is cross-checked against the selection **before**
//!    any token is persisted or any session transition happens.
//!
//! Submission outcomes carry the attempt id they answer; outcomes for any
//! other attempt are stale and dropped.

use vestibule_core::{Effect, Effects, Reducer, smallvec};

use crate::actions::AuthAction;
use crate::config::RoutePlan;
use crate::environment::AuthEnvironment;
use crate::providers::{IdentityGateway, TokenStore};
use crate::state::{
    AttemptId, AuthMode, AuthState, FlowNotice, FlowPhase, LoginFlowState, LoginSurface, Role,
    RoleSelection,
};
use crate::validate;

/// Login/registration flow reducer.
#[derive(Debug, Clone)]
pub struct LoginFlowReducer<G, T> {
    routes: RoutePlan,
    _phantom: std::marker::PhantomData<fn() -> (G, T)>,
}

impl<G, T> LoginFlowReducer<G, T> {
    /// Create a flow reducer redirecting into `routes`.
    #[must_use]
    pub const fn new(routes: RoutePlan) -> Self {
        Self {
            routes,
            _phantom: std::marker::PhantomData,
        }
    }

    /// `true` when `attempt` is the submission currently in flight.
    fn is_current_attempt(flow: &LoginFlowState, attempt: AttemptId) -> bool {
        matches!(flow.phase, FlowPhase::Submitting { attempt: current } if current == attempt)
    }
}

impl<G, T> Reducer for LoginFlowReducer<G, T>
where
    G: IdentityGateway + Clone + 'static,
    T: TokenStore + Clone + 'static,
{
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment<G, T>;

    #[allow(clippy::too_many_lines)] // one arm per flow event
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Entry
            // ═══════════════════════════════════════════════════════════════
            AuthAction::BeginLogin { surface, intent } => {
                state.flow = LoginFlowState {
                    surface: Some(surface),
                    intent,
                    ..LoginFlowState::default()
                };

                match surface {
                    LoginSurface::AdminOnly => {
                        // No role selection; admin is pinned to login.
                        state.flow.selection = Some(RoleSelection {
                            role: Role::Admin,
                            mode: AuthMode::Login,
                        });
                        state.flow.phase = FlowPhase::EnteringCredentials;
                    },
                    LoginSurface::RoleGated => {
                        state.flow.phase = FlowPhase::SelectingRole;
                    },
                }
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Role gate
            // ═══════════════════════════════════════════════════════════════
            AuthAction::RoleChosen { role } => {
                if !matches!(state.flow.phase, FlowPhase::SelectingRole) {
                    tracing::warn!("role chosen outside role selection, ignoring");
                    return smallvec![];
                }
                state.flow.selection = Some(RoleSelection {
                    role,
                    mode: AuthMode::Login,
                });
                state.flow.phase = FlowPhase::EnteringCredentials;
                smallvec![]
            },

            AuthAction::SwitchMode { mode } => {
                if !matches!(state.flow.phase, FlowPhase::EnteringCredentials) {
                    tracing::warn!("mode switch outside credential entry, ignoring");
                    return smallvec![];
                }
                let Some(selection) = state.flow.selection.as_mut() else {
                    tracing::warn!("mode switch without a role selection, ignoring");
                    return smallvec![];
                };
                if mode == AuthMode::Register && !selection.role.allows_registration() {
                    tracing::warn!(
                        role = selection.role.as_str(),
                        "mode switch ignored, role is login-only"
                    );
                    return smallvec![];
                }
                selection.mode = mode;
                state.flow.field_errors = validate::FieldErrors::default();
                state.flow.notice = None;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════════
            // Submission
            // ═══════════════════════════════════════════════════════════════
            AuthAction::SubmitCredentials { form } => {
                // A submit while another call is in flight replaces it; the
                // superseded outcome is dropped by the attempt-id check.
                if !matches!(
                    state.flow.phase,
                    FlowPhase::EnteringCredentials | FlowPhase::Submitting { .. }
                ) {
                    tracing::warn!("credentials submitted outside the form, ignoring");
                    return smallvec![];
                }
                let Some(selection) = state.flow.selection else {
                    tracing::warn!("credentials submitted without a role selection, ignoring");
                    return smallvec![];
                };

                let errors = validate::validate(&form, selection.mode);
                if !errors.is_empty() {
                    // Field-scoped failures block submission entirely.
                    state.flow.field_errors = errors;
                    return smallvec![];
                }
                state.flow.field_errors = validate::FieldErrors::default();
                state.flow.notice = None;

                let attempt = AttemptId::new();
                state.flow.phase = FlowPhase::Submitting { attempt };

                let gateway = env.gateway.clone();
                match selection.mode {
                    AuthMode::Login => {
                        let email = form.email.trim().to_string();
                        let password = form.password;
                        smallvec![Effect::future(async move {
                            match gateway.login(&email, &password).await {
                                Ok(grant) => Some(AuthAction::AuthSucceeded {
                                    attempt,
                                    token: grant.token,
                                    identity: grant.identity,
                                }),
                                Err(error) => Some(AuthAction::AuthFailed { attempt, error }),
                            }
                        })]
                    },
                    AuthMode::Register => {
                        let name = form.name.trim().to_string();
                        let email = form.email.trim().to_string();
                        let password = form.password;
                        smallvec![Effect::future(async move {
                            match gateway.register(&name, &email, &password).await {
                                Ok(grant) => Some(AuthAction::AuthSucceeded {
                                    attempt,
                                    token: grant.token,
                                    identity: grant.identity,
                                }),
                                Err(error) => Some(AuthAction::AuthFailed { attempt, error }),
                            }
                        })]
                    },
                }
            },

            // ═══════════════════════════════════════════════════════════════
            // Outcomes
            // ═══════════════════════════════════════════════════════════════
            AuthAction::AuthSucceeded {
                attempt,
                token,
                identity,
            } => {
                if !Self::is_current_attempt(&state.flow, attempt) {
                    tracing::debug!("dropping stale authentication result");
                    return smallvec![];
                }
                let Some(selection) = state.flow.selection else {
                    tracing::warn!("authentication result without a selection, ignoring");
                    return smallvec![];
                };

                if identity.role != selection.role {
                    // The remote call has already succeeded, so a server-side
                    // session exists at this point; the client only withholds
                    // its own transition and discards the token. Whether that
                    // remote session should be invalidated here is an open
                    // product/security question.
                    tracing::warn!(
                        selected = selection.role.as_str(),
                        returned = identity.role.as_str(),
                        "role mismatch after authentication, denying"
                    );
                    state.flow.phase = FlowPhase::EnteringCredentials;
                    state.flow.notice = Some(FlowNotice::AccessDenied {
                        required: selection.role,
                    });
                    return smallvec![];
                }

                // Persist first, then establish the session. A persistence
                // failure costs the session its reload durability, nothing
                // else; the login itself proceeds.
                if let Err(error) = env.tokens.save(&token) {
                    tracing::warn!(%error, "token persistence failed, session will not survive reload");
                }

                let redirect = if identity.role == Role::Admin {
                    self.routes.admin.clone()
                } else {
                    state
                        .flow
                        .intent
                        .take()
                        .map_or_else(|| self.routes.dashboard.clone(), |intent| intent.path)
                };
                tracing::info!(
                    role = identity.role.as_str(),
                    redirect,
                    "login flow completed"
                );
                state.flow.phase = FlowPhase::Completed { redirect };

                smallvec![Effect::dispatch(AuthAction::SessionEstablished { identity })]
            },

            AuthAction::AuthFailed { attempt, error } => {
                if !Self::is_current_attempt(&state.flow, attempt) {
                    tracing::debug!("dropping stale authentication failure");
                    return smallvec![];
                }
                tracing::info!(%error, "authentication attempt failed");
                state.flow.phase = FlowPhase::EnteringCredentials;
                state.flow.notice = Some(FlowNotice::for_failure(&error));
                smallvec![]
            },

            // Session actions are not ours.
            _ => smallvec![],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::mocks::{MockIdentityGateway, MockTokenStore};
    use crate::state::{Identity, NavigationIntent, Token, UserId};
    use crate::validate::{CredentialForm, Field};
    use vestibule_testing::{ReducerTest, assertions};

    type TestReducer = LoginFlowReducer<MockIdentityGateway, MockTokenStore>;
    type TestEnv = AuthEnvironment<MockIdentityGateway, MockTokenStore>;

    fn reducer() -> TestReducer {
        LoginFlowReducer::new(RoutePlan::default())
    }

    fn test_env() -> TestEnv {
        AuthEnvironment::new(MockIdentityGateway::new(), MockTokenStore::new())
    }

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new("u-1"),
            name: "Test User".to_string(),
            email: "user@example.com".to_string(),
            role,
        }
    }

    fn login_form() -> CredentialForm {
        CredentialForm {
            email: "user@example.com".to_string(),
            password: "hunter22".to_string(),
            ..CredentialForm::default()
        }
    }

    fn submitting_state(role: Role, attempt: AttemptId) -> AuthState {
        AuthState {
            flow: LoginFlowState {
                surface: Some(LoginSurface::RoleGated),
                selection: Some(RoleSelection {
                    role,
                    mode: AuthMode::Login,
                }),
                phase: FlowPhase::Submitting { attempt },
                ..LoginFlowState::default()
            },
            ..AuthState::default()
        }
    }

    #[test]
    fn role_gated_entry_starts_with_role_selection() {
        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(AuthState::default())
            .when_action(AuthAction::BeginLogin {
                surface: LoginSurface::RoleGated,
                intent: None,
            })
            .then_state(|state| {
                assert_eq!(state.flow.phase, FlowPhase::SelectingRole);
                assert_eq!(state.flow.selection, None);
            })
            .run();
    }

    #[test]
    fn admin_entry_skips_role_selection_and_pins_login() {
        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(AuthState::default())
            .when_actions([
                AuthAction::BeginLogin {
                    surface: LoginSurface::AdminOnly,
                    intent: None,
                },
                // Toggling to register must be ignored on the admin surface.
                AuthAction::SwitchMode {
                    mode: AuthMode::Register,
                },
            ])
            .then_state(|state| {
                assert_eq!(state.flow.phase, FlowPhase::EnteringCredentials);
                assert_eq!(
                    state.flow.selection,
                    Some(RoleSelection {
                        role: Role::Admin,
                        mode: AuthMode::Login,
                    })
                );
            })
            .run();
    }

    #[test]
    fn student_may_toggle_between_login_and_register() {
        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(AuthState::default())
            .when_actions([
                AuthAction::BeginLogin {
                    surface: LoginSurface::RoleGated,
                    intent: None,
                },
                AuthAction::RoleChosen {
                    role: Role::Student,
                },
                AuthAction::SwitchMode {
                    mode: AuthMode::Register,
                },
            ])
            .then_state(|state| {
                assert_eq!(
                    state.flow.selection.unwrap().mode,
                    AuthMode::Register
                );
            })
            .run();
    }

    #[test]
    fn invalid_form_blocks_submission_without_network_call() {
        let env = test_env();
        let gateway = env.gateway.clone();

        ReducerTest::new(reducer())
            .with_env(env)
            .given_state(AuthState::default())
            .when_actions([
                AuthAction::BeginLogin {
                    surface: LoginSurface::RoleGated,
                    intent: None,
                },
                AuthAction::RoleChosen {
                    role: Role::Student,
                },
                AuthAction::SubmitCredentials {
                    form: CredentialForm {
                        email: "not-an-email".to_string(),
                        password: "123".to_string(),
                        ..CredentialForm::default()
                    },
                },
            ])
            .then_state(|state| {
                assert_eq!(state.flow.phase, FlowPhase::EnteringCredentials);
                assert!(state.flow.field_errors.get(Field::Email).is_some());
                assert!(state.flow.field_errors.get(Field::Password).is_some());
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        assert!(gateway.calls().unwrap().is_empty());
    }

    #[test]
    fn valid_submission_enters_submitting_with_one_effect() {
        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(AuthState::default())
            .when_actions([
                AuthAction::BeginLogin {
                    surface: LoginSurface::RoleGated,
                    intent: None,
                },
                AuthAction::RoleChosen {
                    role: Role::Student,
                },
                AuthAction::SubmitCredentials { form: login_form() },
            ])
            .then_state(|state| {
                assert!(matches!(state.flow.phase, FlowPhase::Submitting { .. }));
                assert!(state.flow.field_errors.is_empty());
            })
            .then_effects(|effects| assertions::assert_effect_count(effects, 1))
            .run();
    }

    #[test]
    fn role_mismatch_denies_without_persisting_or_transitioning() {
        let env = test_env();
        let tokens = env.tokens.clone();
        let attempt = AttemptId::new();

        ReducerTest::new(reducer())
            .with_env(env)
            .given_state(submitting_state(Role::Admin, attempt))
            .when_action(AuthAction::AuthSucceeded {
                attempt,
                token: Token::new("tok"),
                identity: identity(Role::Student),
            })
            .then_state(|state| {
                // No session transition, and the user sees the denial.
                assert!(!state.session.is_authenticated());
                assert_eq!(state.flow.phase, FlowPhase::EnteringCredentials);
                let notice = state.flow.notice.clone().unwrap();
                assert_eq!(
                    notice.message(),
                    "Access denied: admin privileges required"
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(tokens.stored().unwrap(), None);
        assert_eq!(tokens.save_count().unwrap(), 0);
    }

    #[test]
    fn matching_role_persists_token_and_establishes_session() {
        let env = test_env();
        let tokens = env.tokens.clone();
        let attempt = AttemptId::new();

        ReducerTest::new(reducer())
            .with_env(env)
            .given_state(submitting_state(Role::Student, attempt))
            .when_action(AuthAction::AuthSucceeded {
                attempt,
                token: Token::new("tok-xyz"),
                identity: identity(Role::Student),
            })
            .then_state(|state| {
                assert_eq!(
                    state.flow.phase,
                    FlowPhase::Completed {
                        redirect: "/dashboard".to_string(),
                    }
                );
            })
            .then_effects(|effects| {
                // The session transition travels as a dispatched action.
                assertions::assert_effect_count(effects, 1);
                assert!(matches!(
                    effects[0],
                    Effect::Dispatch(ref action)
                        if matches!(**action, AuthAction::SessionEstablished { .. })
                ));
            })
            .run();

        assert_eq!(tokens.stored().unwrap(), Some(Token::new("tok-xyz")));
    }

    #[test]
    fn success_consumes_the_navigation_intent() {
        let attempt = AttemptId::new();
        let mut state = submitting_state(Role::Student, attempt);
        state.flow.intent = Some(NavigationIntent::new("/dashboard/settings"));

        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(state)
            .when_action(AuthAction::AuthSucceeded {
                attempt,
                token: Token::new("tok"),
                identity: identity(Role::Student),
            })
            .then_state(|state| {
                assert_eq!(
                    state.flow.phase,
                    FlowPhase::Completed {
                        redirect: "/dashboard/settings".to_string(),
                    }
                );
                assert_eq!(state.flow.intent, None, "intent is consumed exactly once");
            })
            .run();
    }

    #[test]
    fn admin_success_redirects_to_the_fixed_admin_path() {
        let attempt = AttemptId::new();
        let mut state = submitting_state(Role::Admin, attempt);
        // Even with a pending intent, admin goes to the admin path.
        state.flow.intent = Some(NavigationIntent::new("/dashboard"));

        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(state)
            .when_action(AuthAction::AuthSucceeded {
                attempt,
                token: Token::new("tok"),
                identity: identity(Role::Admin),
            })
            .then_state(|state| {
                assert_eq!(
                    state.flow.phase,
                    FlowPhase::Completed {
                        redirect: "/admin".to_string(),
                    }
                );
            })
            .run();
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let current = AttemptId::new();
        let stale = AttemptId::new();

        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(submitting_state(Role::Student, current))
            .when_action(AuthAction::AuthSucceeded {
                attempt: stale,
                token: Token::new("tok"),
                identity: identity(Role::Student),
            })
            .then_state(move |state| {
                // Still waiting on the current attempt.
                assert_eq!(state.flow.phase, FlowPhase::Submitting { attempt: current });
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failure_maps_to_a_user_notice_without_session_mutation() {
        let attempt = AttemptId::new();

        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(submitting_state(Role::Student, attempt))
            .when_action(AuthAction::AuthFailed {
                attempt,
                error: AuthError::InvalidCredentials,
            })
            .then_state(|state| {
                assert!(!state.session.is_authenticated());
                assert_eq!(state.flow.phase, FlowPhase::EnteringCredentials);
                assert_eq!(
                    state.flow.notice.clone().unwrap().message(),
                    "invalid email or password"
                );
            })
            .run();
    }

    #[test]
    fn transient_failure_shows_the_retry_notice() {
        let attempt = AttemptId::new();

        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(submitting_state(Role::Student, attempt))
            .when_action(AuthAction::AuthFailed {
                attempt,
                error: AuthError::Network {
                    message: "connection refused".to_string(),
                },
            })
            .then_state(|state| {
                assert_eq!(
                    state.flow.notice,
                    Some(FlowNotice::ServiceUnavailable)
                );
            })
            .run();
    }

    #[test]
    fn register_mode_submits_through_the_register_call() {
        ReducerTest::new(reducer())
            .with_env(test_env())
            .given_state(AuthState::default())
            .when_actions([
                AuthAction::BeginLogin {
                    surface: LoginSurface::RoleGated,
                    intent: None,
                },
                AuthAction::RoleChosen {
                    role: Role::Student,
                },
                AuthAction::SwitchMode {
                    mode: AuthMode::Register,
                },
                AuthAction::SubmitCredentials {
                    form: CredentialForm {
                        name: "Ada Lovelace".to_string(),
                        email: "ada@example.com".to_string(),
                        password: "hunter22".to_string(),
                        confirm_password: "hunter22".to_string(),
                    },
                },
            ])
            .then_state(|state| {
                assert!(matches!(state.flow.phase, FlowPhase::Submitting { .. }));
            })
            .then_effects(|effects| assertions::assert_effect_count(effects, 1))
            .run();
    }
}
