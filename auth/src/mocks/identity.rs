//! Mock identity gateway for testing.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{AuthError, Result};
use crate::providers::identity::{Grant, IdentityGateway};
use crate::state::{Identity, Token};

/// A recorded gateway invocation.
///
/// Passwords are deliberately not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `verify(token)` was called.
    Verify {
        /// The presented token.
        token: Token,
    },
    /// `login(email, _)` was called.
    Login {
        /// The submitted email.
        email: String,
    },
    /// `register(name, email, _)` was called.
    Register {
        /// The submitted email.
        email: String,
    },
    /// `logout(token)` was called.
    Logout {
        /// The presented token.
        token: Token,
    },
}

#[derive(Debug, Default)]
struct Inner {
    verify_results: VecDeque<Result<Identity>>,
    login_results: VecDeque<Result<Grant>>,
    register_results: VecDeque<Result<Grant>>,
    logout_results: VecDeque<Result<()>>,
    calls: Vec<GatewayCall>,
}

/// Scripted identity gateway.
///
/// Each call pops the next scripted result for its method. Unscripted
/// `logout` calls succeed (the common case); any other unscripted call
/// returns an internal error so a missing script line fails the test
/// loudly instead of masquerading as service behavior.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityGateway {
    inner: Arc<Mutex<Inner>>,
}

fn lock_error() -> AuthError {
    AuthError::Internal {
        message: "mutex lock failed".to_string(),
    }
}

fn unscripted(method: &str) -> AuthError {
    AuthError::Internal {
        message: format!("no scripted result for {method}"),
    }
}

impl MockIdentityGateway {
    /// Create a gateway with no scripted results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next `verify` call.
    pub fn expect_verify(&self, result: Result<Identity>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.verify_results.push_back(result);
        }
    }

    /// Queue the result of the next `login` call.
    pub fn expect_login(&self, result: Result<Grant>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.login_results.push_back(result);
        }
    }

    /// Queue the result of the next `register` call.
    pub fn expect_register(&self, result: Result<Grant>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.register_results.push_back(result);
        }
    }

    /// Queue the result of the next `logout` call.
    pub fn expect_logout(&self, result: Result<()>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.logout_results.push_back(result);
        }
    }

    /// Every call observed so far, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn calls(&self) -> Result<Vec<GatewayCall>> {
        Ok(self.inner.lock().map_err(|_| lock_error())?.calls.clone())
    }
}

impl IdentityGateway for MockIdentityGateway {
    fn verify(&self, token: &Token) -> impl Future<Output = Result<Identity>> + Send {
        let inner = Arc::clone(&self.inner);
        let token = token.clone();

        async move {
            let mut guard = inner.lock().map_err(|_| lock_error())?;
            guard.calls.push(GatewayCall::Verify { token });
            guard
                .verify_results
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("verify")))
        }
    }

    fn login(&self, email: &str, _password: &str) -> impl Future<Output = Result<Grant>> + Send {
        let inner = Arc::clone(&self.inner);
        let email = email.to_string();

        async move {
            let mut guard = inner.lock().map_err(|_| lock_error())?;
            guard.calls.push(GatewayCall::Login { email });
            guard
                .login_results
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("login")))
        }
    }

    fn register(
        &self,
        _name: &str,
        email: &str,
        _password: &str,
    ) -> impl Future<Output = Result<Grant>> + Send {
        let inner = Arc::clone(&self.inner);
        let email = email.to_string();

        async move {
            let mut guard = inner.lock().map_err(|_| lock_error())?;
            guard.calls.push(GatewayCall::Register { email });
            guard
                .register_results
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("register")))
        }
    }

    fn logout(&self, token: &Token) -> impl Future<Output = Result<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let token = token.clone();

        async move {
            let mut guard = inner.lock().map_err(|_| lock_error())?;
            guard.calls.push(GatewayCall::Logout { token });
            guard.logout_results.pop_front().unwrap_or(Ok(()))
        }
    }
}
