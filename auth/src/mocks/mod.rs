//! Mock provider implementations for testing.
//!
//! Simple, in-memory implementations of the provider traits, with scripted
//! outcomes and call recording, for unit and integration tests.

pub mod identity;
pub mod token_store;

pub use identity::{GatewayCall, MockIdentityGateway};
pub use token_store::MockTokenStore;
