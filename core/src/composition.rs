//! Reducer composition.
//!
//! [`combine_reducers`] runs several reducers over the same state and action
//! types, concatenating their effects. This lets each feature keep its own
//! reducer (session lifecycle, login flow) while the application drives a
//! single root state through one store.

use crate::effect::Effect;
use crate::reducer::Reducer;
use crate::{Effects, SmallVec};

/// Combine reducers that operate on the same state and action types.
///
/// Reducers run in the order given; every reducer sees the action, and all
/// effects are collected in order. Reducers are expected to ignore actions
/// that aren't theirs (returning no effects), so combination is cheap.
///
/// # Examples
///
/// ```
/// use vestibule_core::{smallvec, Effects, Reducer};
/// use vestibule_core::composition::combine_reducers;
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     visits: u32,
///     last_path: String,
/// }
///
/// #[derive(Clone)]
/// enum AppAction {
///     Visited(String),
/// }
///
/// struct CounterReducer;
/// struct PathReducer;
///
/// impl Reducer for CounterReducer {
///     type State = AppState;
///     type Action = AppAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> Effects<AppAction> {
///         let AppAction::Visited(_) = action;
///         state.visits += 1;
///         smallvec![]
///     }
/// }
///
/// impl Reducer for PathReducer {
///     type State = AppState;
///     type Action = AppAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> Effects<AppAction> {
///         let AppAction::Visited(path) = action;
///         state.last_path = path;
///         smallvec![]
///     }
/// }
///
/// let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(PathReducer)]);
/// let mut state = AppState::default();
/// let _ = combined.reduce(&mut state, AppAction::Visited("/dashboard".into()), &());
/// assert_eq!(state.visits, 1);
/// assert_eq!(state.last_path, "/dashboard");
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        let mut all_effects: Effects<Self::Action> = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}
