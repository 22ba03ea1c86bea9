//! Side-effect descriptions.
//!
//! Effects are **values**, not execution. A reducer returns effect
//! descriptions; the store runtime interprets them, and any actions they
//! produce are fed back into the reducer on a later turn.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A description of a side effect to be executed by the store runtime.
///
/// # Type Parameters
///
/// - `Action`: the action type effects can produce (the feedback loop)
pub enum Effect<Action> {
    /// No-op effect.
    None,

    /// Feed an action straight back into the reducer.
    ///
    /// Used for cross-reducer coordination: one reducer's outcome becomes
    /// another reducer's input without a detour through an async task.
    Dispatch(Box<Action>),

    /// Run effects concurrently.
    Parallel(Vec<Effect<Action>>),

    /// Run effects in order, each awaited before the next starts.
    Sequential(Vec<Effect<Action>>),

    /// Dispatch an action after a delay.
    Delay {
        /// How long to wait.
        duration: Duration,
        /// Action to dispatch after the delay.
        action: Box<Action>,
    },

    /// Arbitrary async computation.
    ///
    /// Resolves to `Some(action)` to feed the action back into the reducer,
    /// or `None` when the computation has nothing further to report.
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
}

impl<Action> Effect<Action> {
    /// Wrap a future as an effect.
    pub fn future<F>(fut: F) -> Self
    where
        F: Future<Output = Option<Action>> + Send + 'static,
    {
        Self::Future(Box::pin(fut))
    }

    /// Feed `action` straight back into the reducer.
    pub fn dispatch(action: Action) -> Self {
        Self::Dispatch(Box::new(action))
    }

    /// Combine effects to run concurrently.
    #[must_use]
    pub fn merge(effects: Vec<Self>) -> Self {
        Self::Parallel(effects)
    }

    /// Chain effects to run sequentially.
    #[must_use]
    pub fn chain(effects: Vec<Self>) -> Self {
        Self::Sequential(effects)
    }
}

// Manual Debug since the Future variant holds an opaque pinned future.
impl<Action> std::fmt::Debug for Effect<Action>
where
    Action: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "Effect::None"),
            Self::Dispatch(action) => f.debug_tuple("Effect::Dispatch").field(action).finish(),
            Self::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
            Self::Sequential(effects) => {
                f.debug_tuple("Effect::Sequential").field(effects).finish()
            },
            Self::Delay { duration, action } => f
                .debug_struct("Effect::Delay")
                .field("duration", duration)
                .field("action", action)
                .finish(),
            Self::Future(_) => write!(f, "Effect::Future(<future>)"),
        }
    }
}
