//! # Vestibule Testing
//!
//! Testing utilities for vestibule reducers.
//!
//! The centerpiece is [`ReducerTest`], a fluent Given/When/Then harness for
//! exercising reducers as pure functions — no store, no spawned tasks, no
//! network. Flow-level behavior (effect execution, feedback actions) is
//! covered separately by driving a real `Store` with mock providers.
//!
//! ## Example
//!
//! ```ignore
//! ReducerTest::new(SessionReducer::new())
//!     .with_env(test_environment())
//!     .given_state(AuthState::default())
//!     .when_action(AuthAction::Bootstrap)
//!     .then_state(|state| assert!(state.session.is_initializing()))
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};
