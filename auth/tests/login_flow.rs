//! Integration tests for the role-gated login/registration flow, driven
//! through the service with mock providers.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use vestibule_auth::mocks::{GatewayCall, MockIdentityGateway, MockTokenStore};
use vestibule_auth::providers::Grant;
use vestibule_auth::state::{FlowPhase, NavigationIntent};
use vestibule_auth::validate::CredentialForm;
use vestibule_auth::{
    AuthAction, AuthConfig, AuthError, AuthMode, AuthService, Identity, LoginSurface, Role, Token,
    UserId,
};

fn identity(role: Role) -> Identity {
    Identity {
        id: UserId::new("u-1"),
        name: "Test User".to_string(),
        email: "user@example.com".to_string(),
        role,
    }
}

fn grant(role: Role, token: &str) -> Grant {
    Grant {
        token: Token::new(token),
        identity: identity(role),
    }
}

fn login_form() -> CredentialForm {
    CredentialForm {
        email: "user@example.com".to_string(),
        password: "hunter22".to_string(),
        ..CredentialForm::default()
    }
}

fn service_with(
    gateway: MockIdentityGateway,
    tokens: MockTokenStore,
) -> AuthService<MockIdentityGateway, MockTokenStore> {
    AuthService::new(AuthConfig::default(), gateway, tokens)
}

async fn fresh_unauthenticated(
    gateway: MockIdentityGateway,
    tokens: MockTokenStore,
) -> AuthService<MockIdentityGateway, MockTokenStore> {
    let service = service_with(gateway, tokens);
    service.bootstrap().await.unwrap().wait().await.unwrap();
    service
}

#[tokio::test]
async fn student_login_happy_path() {
    let gateway = MockIdentityGateway::new();
    gateway.expect_login(Ok(grant(Role::Student, "tok-1")));
    let tokens = MockTokenStore::new();
    let service = fresh_unauthenticated(gateway, tokens.clone()).await;

    service
        .send(AuthAction::BeginLogin {
            surface: LoginSurface::RoleGated,
            intent: None,
        })
        .await
        .unwrap();
    service
        .send(AuthAction::RoleChosen {
            role: Role::Student,
        })
        .await
        .unwrap();
    let handle = service
        .send(AuthAction::SubmitCredentials { form: login_form() })
        .await
        .unwrap();
    handle.wait().await.unwrap();

    assert!(service.is_authenticated().await);
    assert_eq!(
        service.flow().await.phase,
        FlowPhase::Completed {
            redirect: "/dashboard".to_string(),
        }
    );
    // Token persisted before the session transition.
    assert_eq!(tokens.stored().unwrap(), Some(Token::new("tok-1")));
}

#[tokio::test]
async fn admin_selection_with_student_account_is_denied() {
    let gateway = MockIdentityGateway::new();
    // The service authenticates the credentials, but as a student.
    gateway.expect_login(Ok(grant(Role::Student, "tok-evil")));
    let tokens = MockTokenStore::new();
    let service = fresh_unauthenticated(gateway, tokens.clone()).await;

    service
        .send(AuthAction::BeginLogin {
            surface: LoginSurface::AdminOnly,
            intent: None,
        })
        .await
        .unwrap();
    let handle = service
        .send(AuthAction::SubmitCredentials { form: login_form() })
        .await
        .unwrap();
    handle.wait().await.unwrap();

    // No authenticated transition, no persisted token, denial on screen.
    assert!(!service.is_authenticated().await);
    assert_eq!(tokens.stored().unwrap(), None);

    let flow = service.flow().await;
    assert_eq!(flow.phase, FlowPhase::EnteringCredentials);
    assert_eq!(
        flow.notice.unwrap().message(),
        "Access denied: admin privileges required"
    );
}

#[tokio::test]
async fn invalid_credentials_show_the_field_agnostic_message() {
    let gateway = MockIdentityGateway::new();
    gateway.expect_login(Err(AuthError::InvalidCredentials));
    let service = fresh_unauthenticated(gateway, MockTokenStore::new()).await;

    service
        .send(AuthAction::BeginLogin {
            surface: LoginSurface::RoleGated,
            intent: None,
        })
        .await
        .unwrap();
    service
        .send(AuthAction::RoleChosen {
            role: Role::Student,
        })
        .await
        .unwrap();

    // Exercise the request-response path: wait for the terminal outcome.
    let outcome = service
        .send_and_wait_for(
            AuthAction::SubmitCredentials { form: login_form() },
            |a| matches!(a, AuthAction::AuthSucceeded { .. } | AuthAction::AuthFailed { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, AuthAction::AuthFailed { .. }));
    assert!(!service.is_authenticated().await);

    let flow = service.flow().await;
    assert_eq!(
        flow.notice.unwrap().message(),
        "invalid email or password"
    );
}

#[tokio::test]
async fn registration_happy_path_goes_through_the_register_call() {
    let gateway = MockIdentityGateway::new();
    gateway.expect_register(Ok(grant(Role::Student, "tok-new")));
    let tokens = MockTokenStore::new();
    let service = fresh_unauthenticated(gateway.clone(), tokens.clone()).await;

    service
        .send(AuthAction::BeginLogin {
            surface: LoginSurface::RoleGated,
            intent: None,
        })
        .await
        .unwrap();
    service
        .send(AuthAction::RoleChosen {
            role: Role::Student,
        })
        .await
        .unwrap();
    service
        .send(AuthAction::SwitchMode {
            mode: AuthMode::Register,
        })
        .await
        .unwrap();
    let handle = service
        .send(AuthAction::SubmitCredentials {
            form: CredentialForm {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "hunter22".to_string(),
                confirm_password: "hunter22".to_string(),
            },
        })
        .await
        .unwrap();
    handle.wait().await.unwrap();

    assert!(service.is_authenticated().await);
    assert_eq!(tokens.stored().unwrap(), Some(Token::new("tok-new")));
    assert_eq!(
        gateway.calls().unwrap(),
        vec![GatewayCall::Register {
            email: "ada@example.com".to_string(),
        }]
    );
}

#[tokio::test]
async fn taken_email_surfaces_the_server_message() {
    let gateway = MockIdentityGateway::new();
    gateway.expect_register(Err(AuthError::Rejected {
        message: "Email already registered".to_string(),
    }));
    let service = fresh_unauthenticated(gateway, MockTokenStore::new()).await;

    service
        .send(AuthAction::BeginLogin {
            surface: LoginSurface::RoleGated,
            intent: None,
        })
        .await
        .unwrap();
    service
        .send(AuthAction::RoleChosen {
            role: Role::Student,
        })
        .await
        .unwrap();
    service
        .send(AuthAction::SwitchMode {
            mode: AuthMode::Register,
        })
        .await
        .unwrap();
    let handle = service
        .send(AuthAction::SubmitCredentials {
            form: CredentialForm {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "hunter22".to_string(),
                confirm_password: "hunter22".to_string(),
            },
        })
        .await
        .unwrap();
    handle.wait().await.unwrap();

    let flow = service.flow().await;
    assert_eq!(flow.notice.unwrap().message(), "Email already registered");
    assert!(!service.is_authenticated().await);
}

#[tokio::test]
async fn validation_failures_never_reach_the_gateway() {
    let gateway = MockIdentityGateway::new();
    let service = fresh_unauthenticated(gateway.clone(), MockTokenStore::new()).await;

    service
        .send(AuthAction::BeginLogin {
            surface: LoginSurface::RoleGated,
            intent: None,
        })
        .await
        .unwrap();
    service
        .send(AuthAction::RoleChosen {
            role: Role::Student,
        })
        .await
        .unwrap();
    let handle = service
        .send(AuthAction::SubmitCredentials {
            form: CredentialForm {
                email: "not-an-email".to_string(),
                password: "123".to_string(),
                ..CredentialForm::default()
            },
        })
        .await
        .unwrap();
    handle.wait().await.unwrap();

    assert!(gateway.calls().unwrap().is_empty());
    assert!(!service.flow().await.field_errors.is_empty());
}

#[tokio::test]
async fn admin_login_via_dedicated_surface_redirects_to_admin() {
    let gateway = MockIdentityGateway::new();
    gateway.expect_login(Ok(grant(Role::Admin, "tok-admin")));
    let service = fresh_unauthenticated(gateway, MockTokenStore::new()).await;

    service
        .send(AuthAction::BeginLogin {
            surface: LoginSurface::AdminOnly,
            // A pending intent must not divert an admin login.
            intent: Some(NavigationIntent::new("/dashboard")),
        })
        .await
        .unwrap();
    let handle = service
        .send(AuthAction::SubmitCredentials { form: login_form() })
        .await
        .unwrap();
    handle.wait().await.unwrap();

    assert!(service.is_authenticated().await);
    assert_eq!(
        service.flow().await.phase,
        FlowPhase::Completed {
            redirect: "/admin".to_string(),
        }
    );
}
