//! # Vestibule Core
//!
//! Core traits and types for the vestibule reducer architecture.
//!
//! This crate provides the fundamental abstractions used by the session and
//! login-flow state machines:
//!
//! - **State**: owned domain state for a feature
//! - **Action**: a closed union of all inputs to a reducer (commands and
//!   events produced by effect execution)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side-effect descriptions (values, not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional core, imperative shell
//! - Unidirectional data flow
//! - Explicit effects (no hidden I/O)
//! - Dependency injection via the environment parameter
//!
//! ## Example
//!
//! ```
//! use vestibule_core::{smallvec, Effect, Effects, Reducer};
//!
//! #[derive(Clone, Debug, Default)]
//! struct GateState {
//!     open: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum GateAction {
//!     Open,
//!     Close,
//! }
//!
//! struct GateReducer;
//!
//! impl Reducer for GateReducer {
//!     type State = GateState;
//!     type Action = GateAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut GateState,
//!         action: GateAction,
//!         _env: &(),
//!     ) -> Effects<GateAction> {
//!         match action {
//!             GateAction::Open => state.open = true,
//!             GateAction::Close => state.open = false,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = GateState::default();
//! let _ = GateReducer.reduce(&mut state, GateAction::Open, &());
//! assert!(state.open);
//! ```

pub mod composition;
pub mod effect;
pub mod reducer;

pub use effect::Effect;
pub use reducer::Reducer;

// Re-export the inline vector used for reducer return values so downstream
// crates don't need their own smallvec dependency.
pub use smallvec::{SmallVec, smallvec};

/// The effect batch returned by a reducer.
///
/// Most reducer arms return between zero and two effects; the inline capacity
/// keeps the common case allocation-free.
pub type Effects<A> = SmallVec<[Effect<A>; 4]>;
