//! Mode guard - constrain which actions are legal in the current mode
//!
//! A [`TransitionTable`] maps `(mode, action type)` to the next mode. Pairs
//! without an entry are no-ops: ignoring a `SUBMIT` while `Loading` is expected,
//! not an error.
//!
//! Two pieces share one table:
//! - [`Guarded`] wraps a reducer. It returns the state unchanged for unknown
//!   pairs and otherwise runs the inner reducer and moves to the next mode.
//! - [`TransitionGuard`] is a middleware that drops disallowed actions before
//!   the rest of the chain runs (so later middleware never see them) and logs
//!   the drop.
//!
//! ```ignore
//! let table = Arc::new(
//!     TransitionTable::new()
//!         .allow(Mode::Idle, "SUBMIT", Mode::Loading)
//!         .allow(Mode::Loading, "LOADED", Mode::Ready)
//!         .allow(Mode::Loading, "FAILED", Mode::Failed),
//! );
//! let store = Store::builder(Guarded::new(Arc::clone(&table), reduce), AppState::default())
//!     .add_middleware(TransitionGuard::new(table))
//!     .build();
//! ```

use crate::action::Action;
use crate::error::Result;
use crate::middleware::{Dispatchable, Dispatched, Middleware, MiddlewareApi, Next};
use crate::reducer::{update, Reducer};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// State that carries a named mode
pub trait Modal {
    type Mode: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    fn mode(&self) -> &Self::Mode;

    fn set_mode(&mut self, mode: Self::Mode);
}

/// `(mode, action type) -> next mode` lookup table
#[derive(Debug, Clone)]
pub struct TransitionTable<M> {
    transitions: HashMap<M, HashMap<String, M>>,
}

impl<M: Eq + Hash> TransitionTable<M> {
    pub fn new() -> Self {
        Self {
            transitions: HashMap::new(),
        }
    }

    /// Allow `action_type` in mode `from`, moving to mode `to`
    pub fn allow(mut self, from: M, action_type: impl Into<String>, to: M) -> Self {
        self.transitions
            .entry(from)
            .or_default()
            .insert(action_type.into(), to);
        self
    }

    pub fn next_mode(&self, from: &M, action_type: &str) -> Option<&M> {
        self.transitions.get(from)?.get(action_type)
    }

    pub fn is_allowed(&self, from: &M, action_type: &str) -> bool {
        self.next_mode(from, action_type).is_some()
    }
}

impl<M: Eq + Hash> Default for TransitionTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reducer wrapper applying the transition table
pub struct Guarded<R, M> {
    table: Arc<TransitionTable<M>>,
    inner: R,
}

impl<R, M> Guarded<R, M> {
    pub fn new(table: Arc<TransitionTable<M>>, inner: R) -> Self {
        Self { table, inner }
    }
}

impl<S, A, R, M> Reducer<S, A> for Guarded<R, M>
where
    S: Modal<Mode = M> + Clone + Send + Sync,
    A: Action,
    R: Reducer<S, A>,
    M: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    fn reduce(&self, state: &Arc<S>, action: &A) -> Result<Arc<S>> {
        let Some(next_mode) = self.table.next_mode(state.mode(), action.action_type()) else {
            return Ok(Arc::clone(state));
        };

        let reduced = self.inner.reduce(state, action)?;
        if reduced.mode() == next_mode {
            return Ok(reduced);
        }
        Ok(update(&reduced, |s| s.set_mode(next_mode.clone())))
    }
}

/// TransitionGuard - drops actions that are not allowed in the current mode
pub struct TransitionGuard<M> {
    table: Arc<TransitionTable<M>>,
}

impl<M> TransitionGuard<M> {
    pub fn new(table: Arc<TransitionTable<M>>) -> Self {
        Self { table }
    }
}

impl<S, A, M> Middleware<S, A> for TransitionGuard<M>
where
    S: Modal<Mode = M> + Send + Sync + 'static,
    A: Action,
    M: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    fn handle(
        &self,
        action: Dispatchable<S, A>,
        api: &MiddlewareApi<'_, S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Dispatched> {
        if let Dispatchable::Action(inner) = &action {
            let state = api.get_state();
            if !self.table.is_allowed(state.mode(), inner.action_type()) {
                log::debug!(
                    "Ignoring {} in mode {:?}",
                    inner.action_type(),
                    state.mode()
                );
                return Ok(Dispatched::Swallowed);
            }
        }
        next.run(action)
    }

    fn name(&self) -> &str {
        "transition-guard"
    }
}
