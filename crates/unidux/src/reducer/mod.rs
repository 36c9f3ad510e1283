//! Reducers - pure functions that produce the next state from current state + action
//!
//! Reducers take the current state by `Arc` and return an `Arc`. Returning
//! `Arc::clone(state)` means "nothing changed", which lets the store and
//! subscribers detect changes with a pointer comparison instead of a deep
//! equality check.
//!
//! A reducer must:
//! - return an equivalent result for the same `(state, action)` pair
//! - never mutate the state it was given
//! - not perform I/O, logging or anything else observable
//! - return the input `Arc` unchanged for action types it does not handle

use crate::error::Result;
use std::sync::Arc;

pub mod combine;

pub use combine::{combine_reducers, CombineReducers, CombinedState, Slice};

/// Reducer trait - computes the next state for an action
///
/// Plain functions and closures of shape `Fn(&Arc<S>, &A) -> Arc<S>` are
/// reducers. Implement the trait directly only for reducers that can detect
/// a contract violation, like the combined reducer.
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: &Arc<S>, action: &A) -> Result<Arc<S>>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync,
{
    fn reduce(&self, state: &Arc<S>, action: &A) -> Result<Arc<S>> {
        Ok(self(state, action))
    }
}

/// Apply `f` to a copy of `state` and wrap it in a fresh `Arc`
///
/// Convenience for reducer arms that change something:
///
/// ```ignore
/// CounterAction::Increment => update(state, |s| s.count += 1),
/// ```
pub fn update<S: Clone>(state: &Arc<S>, f: impl FnOnce(&mut S)) -> Arc<S> {
    let mut next = S::clone(state);
    f(&mut next);
    Arc::new(next)
}
