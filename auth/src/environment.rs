//! Authentication environment.
//!
//! The environment carries the auth reducers' injected dependencies.

use crate::providers::{IdentityGateway, TokenStore};

/// Dependencies injected into the auth reducers.
///
/// # Type Parameters
///
/// - `G`: identity gateway (remote identity service client)
/// - `T`: token store (durable credential persistence)
#[derive(Debug, Clone)]
pub struct AuthEnvironment<G, T>
where
    G: IdentityGateway + Clone,
    T: TokenStore + Clone,
{
    /// Identity service client.
    pub gateway: G,

    /// Durable token persistence.
    pub tokens: T,
}

impl<G, T> AuthEnvironment<G, T>
where
    G: IdentityGateway + Clone,
    T: TokenStore + Clone,
{
    /// Create a new authentication environment.
    #[must_use]
    pub const fn new(gateway: G, tokens: T) -> Self {
        Self { gateway, tokens }
    }
}
