//! HTTP implementation of the identity gateway.
//!
//! Speaks the identity service's wire contract:
//!
//! - `POST /auth/login {email, password}`
//! - `POST /auth/register {name, email, password}`
//! - `GET /auth/me` (bearer token)
//! - `POST /auth/logout` (bearer token)
//!
//! Every response uses the same envelope:
//! `{success, token?, user?, message?}`. Decoding is factored into pure
//! functions so the status/envelope → error mapping is testable without a
//! server.

use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::providers::identity::{Grant, IdentityGateway};
use crate::state::{Identity, Role, Token, UserId};

/// Identity gateway backed by `reqwest`.
///
/// The request timeout comes from [`AuthConfig`]; the core defines no
/// timeout policy of its own.
#[derive(Debug, Clone)]
pub struct HttpIdentityGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityGateway {
    /// Build a gateway for the configured identity service.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::Internal {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport_error(e: &reqwest::Error) -> AuthError {
    AuthError::Network {
        message: e.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Wire Types
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// The service's uniform response envelope.
#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<WireUser>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: WireId,
    name: String,
    email: String,
    role: Role,
}

/// User ids arrive as strings or numbers depending on the backing store.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireUser> for Identity {
    fn from(user: WireUser) -> Self {
        let id = match user.id {
            WireId::Text(s) => UserId::new(s),
            WireId::Number(n) => UserId::new(n.to_string()),
        };
        Self {
            id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Response Decoding (pure)
// ═══════════════════════════════════════════════════════════════════════

fn parse_envelope(status: u16, body: &str) -> Result<AuthEnvelope> {
    if status >= 500 {
        return Err(AuthError::Server { status });
    }
    serde_json::from_str(body).map_err(|_| AuthError::Server { status })
}

fn grant_from(envelope: AuthEnvelope, status: u16) -> Result<Grant> {
    match (envelope.token, envelope.user) {
        (Some(token), Some(user)) => Ok(Grant {
            token: Token::new(token),
            identity: user.into(),
        }),
        // A success envelope without its payload is a service bug.
        _ => Err(AuthError::Server { status }),
    }
}

fn decode_login(status: u16, body: &str) -> Result<Grant> {
    let envelope = parse_envelope(status, body)?;
    if (200..300).contains(&status) && envelope.success {
        return grant_from(envelope, status);
    }
    Err(AuthError::InvalidCredentials)
}

fn decode_register(status: u16, body: &str) -> Result<Grant> {
    let envelope = parse_envelope(status, body)?;
    if (200..300).contains(&status) && envelope.success {
        return grant_from(envelope, status);
    }
    Err(AuthError::Rejected {
        message: envelope
            .message
            .unwrap_or_else(|| "registration rejected".to_string()),
    })
}

fn decode_verify(status: u16, body: &str) -> Result<Identity> {
    let envelope = parse_envelope(status, body)?;
    if (200..300).contains(&status) && envelope.success {
        return envelope
            .user
            .map(Identity::from)
            .ok_or(AuthError::Server { status });
    }
    // Any rejection of the presented token reads as an invalid token; the
    // caller downgrades silently.
    Err(AuthError::InvalidToken)
}

fn decode_logout(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AuthError::Server { status })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Gateway Implementation
// ═══════════════════════════════════════════════════════════════════════

impl IdentityGateway for HttpIdentityGateway {
    fn verify(&self, token: &Token) -> impl std::future::Future<Output = Result<Identity>> + Send {
        let request = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token.as_str());

        async move {
            let response = request.send().await.map_err(|e| transport_error(&e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| transport_error(&e))?;
            decode_verify(status, &body)
        }
    }

    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Grant>> + Send {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password });

        async move {
            let response = request.send().await.map_err(|e| transport_error(&e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| transport_error(&e))?;
            decode_login(status, &body)
        }
    }

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Grant>> + Send {
        let request = self
            .client
            .post(self.url("/auth/register"))
            .json(&RegisterRequest {
                name,
                email,
                password,
            });

        async move {
            let response = request.send().await.map_err(|e| transport_error(&e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| transport_error(&e))?;
            decode_register(status, &body)
        }
    }

    fn logout(&self, token: &Token) -> impl std::future::Future<Output = Result<()>> + Send {
        let request = self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(token.as_str());

        async move {
            let response = request.send().await.map_err(|e| transport_error(&e))?;
            decode_logout(response.status().as_u16())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_USER: &str = r#"{
        "success": true,
        "token": "tok-123",
        "user": {"id": 7, "name": "Ada", "email": "ada@example.com", "role": "student"},
        "message": "welcome"
    }"#;

    #[test]
    fn decode_login_success_builds_grant() {
        #[allow(clippy::unwrap_used)]
        let grant = decode_login(200, OK_USER).unwrap();
        assert_eq!(grant.token.as_str(), "tok-123");
        assert_eq!(grant.identity.id.as_str(), "7");
        assert_eq!(grant.identity.role, Role::Student);
    }

    #[test]
    fn decode_login_rejection_is_invalid_credentials() {
        let body = r#"{"success": false, "message": "Invalid email or password"}"#;
        assert_eq!(
            decode_login(401, body),
            Err(AuthError::InvalidCredentials)
        );
        // Some deployments answer 200 with success=false; same outcome.
        assert_eq!(
            decode_login(200, body),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn decode_login_maps_5xx_to_server_error() {
        assert_eq!(
            decode_login(503, "gateway timeout"),
            Err(AuthError::Server { status: 503 })
        );
    }

    #[test]
    fn decode_login_maps_garbage_body_to_server_error() {
        assert_eq!(
            decode_login(200, "<html>not json</html>"),
            Err(AuthError::Server { status: 200 })
        );
    }

    #[test]
    fn decode_login_success_without_payload_is_server_error() {
        let body = r#"{"success": true}"#;
        assert_eq!(decode_login(200, body), Err(AuthError::Server { status: 200 }));
    }

    #[test]
    fn decode_register_rejection_carries_server_message() {
        let body = r#"{"success": false, "message": "Email already registered"}"#;
        assert_eq!(
            decode_register(409, body),
            Err(AuthError::Rejected {
                message: "Email already registered".to_string(),
            })
        );
    }

    #[test]
    fn decode_register_rejection_without_message_uses_default() {
        let body = r#"{"success": false}"#;
        assert_eq!(
            decode_register(400, body),
            Err(AuthError::Rejected {
                message: "registration rejected".to_string(),
            })
        );
    }

    #[test]
    fn decode_verify_success_returns_identity() {
        #[allow(clippy::unwrap_used)]
        let identity = decode_verify(200, OK_USER).unwrap();
        assert_eq!(identity.email, "ada@example.com");
    }

    #[test]
    fn decode_verify_rejection_is_invalid_token() {
        let body = r#"{"success": false, "message": "Unauthorized"}"#;
        assert_eq!(decode_verify(401, body), Err(AuthError::InvalidToken));
    }

    #[test]
    fn decode_verify_maps_5xx_to_server_error() {
        assert_eq!(
            decode_verify(500, ""),
            Err(AuthError::Server { status: 500 })
        );
    }

    #[test]
    fn wire_ids_accept_strings_and_numbers() {
        let body = r#"{
            "success": true,
            "token": "t",
            "user": {"id": "abc-1", "name": "N", "email": "n@x.io", "role": "mentor"}
        }"#;
        #[allow(clippy::unwrap_used)]
        let grant = decode_login(200, body).unwrap();
        assert_eq!(grant.identity.id.as_str(), "abc-1");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        #[allow(clippy::unwrap_used)]
        let gateway =
            HttpIdentityGateway::new(&AuthConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(gateway.url("/auth/me"), "http://localhost:3000/auth/me");
    }
}
