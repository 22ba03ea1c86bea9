//! The `Reducer` trait — the core abstraction for business logic.
//!
//! Reducers are pure functions over owned state:
//! `(State, Action, Environment) → (State, Effects)`. All I/O is expressed as
//! [`Effect`](crate::effect::Effect) values that the runtime executes after
//! the reducer returns.

use crate::Effects;

/// The core trait for business logic.
///
/// # Type Parameters
///
/// - `State`: the domain state this reducer operates on
/// - `Action`: the action type this reducer processes
/// - `Environment`: the injected dependencies this reducer needs
///
/// # Contract
///
/// `reduce` must not block and must not perform hidden I/O: every interaction
/// with the outside world is either a synchronous environment call the caller
/// has declared safe (e.g. local token persistence) or an effect description
/// returned for the runtime to execute.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State;

    /// The action type this reducer processes.
    type Action;

    /// The environment type with injected dependencies.
    type Environment;

    /// Reduce an action into state changes and effects.
    ///
    /// 1. Validates the action against the current state
    /// 2. Updates state in place
    /// 3. Returns effect descriptions for the runtime to execute
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action>;
}
