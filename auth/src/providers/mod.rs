//! Providers: the auth core's external dependencies.
//!
//! Providers are **interfaces**, not implementations. The reducers depend on
//! these traits through the environment, which makes the session and login
//! logic testable at memory speed:
//!
//! - **Testing**: in-memory mocks (see [`crate::mocks`])
//! - **Production**: [`HttpIdentityGateway`] against the remote identity
//!   service, [`FileTokenStore`] for durable token persistence
//!
//! The identity service itself — credential verification, issuance,
//! revocation — is an external collaborator; this crate only consumes the
//! wire contract.

pub mod http;
pub mod identity;
pub mod token_file;
pub mod token_store;

pub use http::HttpIdentityGateway;
pub use identity::{Grant, IdentityGateway};
pub use token_file::FileTokenStore;
pub use token_store::TokenStore;
