//! # Vestibule Runtime
//!
//! The `Store` runtime for the vestibule reducer architecture.
//!
//! A [`Store`] owns one root state value and coordinates the
//! action → reducer → effects → action feedback loop:
//!
//! - `send()` serializes reducer execution behind a write lock, so the
//!   reducer is the single writer of state.
//! - Effects returned by the reducer execute on spawned tasks; actions they
//!   produce are fed back through the same path and broadcast to observers.
//! - `shutdown()` flips a liveness flag and drains pending effects. Once the
//!   flag is set, effect results are **dropped** instead of applied — an
//!   in-flight verification can never mutate state after the owning
//!   application context has been torn down.
//!
//! ## Example
//!
//! ```ignore
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let handle = store.send(Action::DoSomething).await?;
//! handle.wait().await?;
//!
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use vestibule_core::{Effect, Reducer};

pub use error::StoreError;

/// Error types for the store runtime.
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during store operations.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The store is shutting down and not accepting new actions.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a terminal action.
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before a
        /// matching action is received, and by `EffectHandle::wait_with_timeout`.
        #[error("Timeout waiting for action")]
        Timeout,

        /// The action broadcast channel closed, typically during shutdown.
        #[error("Action broadcast channel closed")]
        ChannelClosed,

        /// A spawned effect task panicked or was cancelled.
        #[error("Effect task failed: {0}")]
        TaskJoin(#[from] tokio::task::JoinError),
    }
}

/// Handle to the effect tasks spawned by a single `send()`.
///
/// Effects execute asynchronously; `send()` returns after *starting* them.
/// Await the handle when a caller (typically a test) needs the whole cascade
/// — including feedback actions and their own effects — to have finished.
#[derive(Debug)]
pub struct EffectHandle {
    handles: Vec<JoinHandle<()>>,
}

impl EffectHandle {
    /// Wait for all spawned effect tasks (and their cascades) to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskJoin`] if an effect task panicked.
    pub async fn wait(self) -> Result<(), StoreError> {
        for handle in self.handles {
            handle.await?;
        }
        Ok(())
    }

    /// Wait for effect completion, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the effects are still running when
    /// the timeout elapses, or [`StoreError::TaskJoin`] if a task panicked.
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    /// Number of top-level effect tasks spawned by the originating `send()`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// `true` when the `send()` produced no effects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

struct StoreInner<S, A, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    shutdown: AtomicBool,
    pending_effects: AtomicUsize,
    /// Actions produced by effects are broadcast to observers. This enables
    /// request-response patterns (`send_and_wait_for`) and lets application
    /// shells react to navigation-relevant events.
    action_broadcast: broadcast::Sender<A>,
}

/// The store: single-writer state holder plus effect executor.
///
/// Cloning a `Store` is cheap and shares the underlying state; this is how
/// the one-per-application session service is handed to the parts of the
/// shell that need it.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<StoreInner<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Clone + Send + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    ///
    /// The action broadcast channel buffers 16 actions; use
    /// [`Store::with_broadcast_capacity`] if observers frequently lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                pending_effects: AtomicUsize::new(0),
                action_broadcast,
            }),
        }
    }

    /// Read a projection of the current state.
    pub async fn state<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Send an action to the store.
    ///
    /// 1. Acquires the write lock and runs the reducer
    /// 2. Spawns a task per returned effect
    /// 3. Actions produced by effects feed back through the same path
    ///
    /// `send()` returns after starting effect execution, not after
    /// completion; await the returned [`EffectHandle`] to observe completion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.is_shut_down() {
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.dispatched").increment(1);

        let effects = {
            let mut state = self.inner.state.write().await;
            self.inner
                .reducer
                .reduce(&mut state, action, &self.inner.environment)
        };

        let mut handles = Vec::with_capacity(effects.len());
        for effect in effects {
            if matches!(effect, Effect::None) {
                continue;
            }
            metrics::counter!("store.effects.spawned").increment(1);
            self.inner.pending_effects.fetch_add(1, Ordering::AcqRel);

            let inner = Arc::clone(&self.inner);
            handles.push(tokio::spawn(async move {
                execute_effect(&inner, effect).await;
                inner.pending_effects.fetch_sub(1, Ordering::AcqRel);
            }));
        }

        Ok(EffectHandle { handles })
    }

    /// Send an action and wait for a matching result action.
    ///
    /// Designed for request-response flows: subscribe to the action
    /// broadcast *before* sending (no race), then return the first
    /// effect-produced action matching `predicate`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within `timeout`
    /// - [`StoreError::ChannelClosed`]: broadcast closed (store shut down)
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut rx = self.inner.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Keep waiting; the timeout catches a dropped terminal.
                        tracing::warn!(skipped, "action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by effects.
    ///
    /// Initial actions passed to `send()` are not broadcast, only the
    /// feedback actions their effects produce.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.inner.action_broadcast.subscribe()
    }

    /// `true` once shutdown has been initiated.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.load(Ordering::Acquire)
    }

    /// Initiate graceful shutdown.
    ///
    /// Sets the liveness flag — from this point new actions are rejected and
    /// in-flight effect results are dropped instead of applied — then waits
    /// for pending effect tasks to drain.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("initiating store shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.inner.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.inner.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                metrics::counter!("store.shutdown.completed").increment(1);
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending, "shutdown timeout with effects still running");
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Execute one effect, feeding any produced actions back into the reducer.
fn execute_effect<'a, S, A, E, R>(
    inner: &'a Arc<StoreInner<S, A, E, R>>,
    effect: Effect<A>,
) -> BoxFuture<'a, ()>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Clone + Send + 'static,
    E: Send + Sync + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {},
            Effect::Dispatch(action) => feed_action(inner, *action).await,
            Effect::Parallel(effects) => {
                futures::future::join_all(effects.into_iter().map(|e| execute_effect(inner, e)))
                    .await;
            },
            Effect::Sequential(effects) => {
                for e in effects {
                    execute_effect(inner, e).await;
                }
            },
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                feed_action(inner, *action).await;
            },
            Effect::Future(fut) => {
                if let Some(action) = fut.await {
                    feed_action(inner, action).await;
                }
            },
        }
    })
}

/// Apply an effect-produced action: reduce, broadcast, then run the
/// follow-on effects inline so an `EffectHandle` covers the whole cascade.
fn feed_action<'a, S, A, E, R>(inner: &'a Arc<StoreInner<S, A, E, R>>, action: A) -> BoxFuture<'a, ()>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Clone + Send + 'static,
    E: Send + Sync + 'static,
{
    Box::pin(async move {
        // Liveness guard: results arriving after teardown must not be applied.
        if inner.shutdown.load(Ordering::Acquire) {
            metrics::counter!("store.actions.dropped_after_shutdown").increment(1);
            tracing::debug!("dropping effect-produced action after shutdown");
            return;
        }

        let effects = {
            let mut state = inner.state.write().await;
            inner
                .reducer
                .reduce(&mut state, action.clone(), &inner.environment)
        };

        // Broadcast after reducing so observers never see an action before
        // its state transition has been applied. Send fails only when there
        // are no subscribers, which is fine.
        let _ = inner.action_broadcast.send(action);

        for effect in effects {
            execute_effect(inner, effect).await;
        }
    })
}
