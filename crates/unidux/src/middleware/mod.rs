//! Middleware system
//!
//! Middleware sits between dispatch and reducer execution, allowing side
//! effects, async operations, logging, and other cross-cutting concerns to be
//! handled in a composable way.
//!
//! ## Design
//!
//! ```text
//! dispatch → Middleware 1 → Middleware 2 → ... → Reducer → State
//! ```
//!
//! Middleware run in registration order. Each one receives the dispatched
//! value, a [`MiddlewareApi`] and the [`Next`] link of the chain, and can:
//! - pass the action on unchanged: `next.run(action)`
//! - transform it: `next.run(Dispatchable::Action(other))`
//! - swallow it: return `Ok(Dispatched::Swallowed)` without calling `next`
//! - dispatch new actions via `api.dispatch(..)`; these are queued and go
//!   through the whole chain after the current pass finished
//!
//! `Next` is consumed by `run`, so the reducer sees at most one action per pass.
//!
//! ## Example
//!
//! ```ignore
//! struct AuditMiddleware;
//!
//! impl Middleware<AppState, AppAction> for AuditMiddleware {
//!     fn handle(
//!         &self,
//!         action: Dispatchable<AppState, AppAction>,
//!         api: &MiddlewareApi<'_, AppState, AppAction>,
//!         next: Next<'_, AppState, AppAction>,
//!     ) -> Result<Dispatched> {
//!         let outcome = next.run(action)?;
//!         if matches!(outcome, Dispatched::Reduced { changed: true }) {
//!             api.dispatch(AppAction::MarkDirty);
//!         }
//!         Ok(outcome)
//!     }
//! }
//! ```

use crate::action::Action;
use crate::error::Result;
use crate::store::{read_state, StateCell};
use std::any::type_name;
use std::cell::RefCell;
use std::sync::Arc;

mod dispatcher;
mod logging;
mod thunk;

pub use dispatcher::Dispatcher;
pub use logging::LoggingMiddleware;
pub use thunk::{Dispatchable, Thunk, ThunkContext, ThunkHandle, ThunkMiddleware};

/// What happened to a dispatched value
#[derive(Debug)]
pub enum Dispatched {
    /// The reducer ran; `changed` tells whether the state reference changed
    Reduced { changed: bool },
    /// A middleware consumed the action before it reached the reducer
    Swallowed,
    /// A thunk was started
    Spawned(ThunkHandle),
}

impl Dispatched {
    pub fn changed(&self) -> bool {
        matches!(self, Dispatched::Reduced { changed: true })
    }
}

/// Middleware trait - intercepts dispatched values before they reach the reducer
pub trait Middleware<S, A>: Send + Sync {
    /// Handle a dispatched value
    ///
    /// - `action`: The action or thunk being dispatched
    /// - `api`: Read the state, dispatch follow-up actions
    /// - `next`: The rest of the chain, ending in the reducer
    fn handle(
        &self,
        action: Dispatchable<S, A>,
        api: &MiddlewareApi<'_, S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Dispatched>;

    /// Name used in logs and errors
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

/// Store access handed to middleware during a dispatch pass
pub struct MiddlewareApi<'a, S, A> {
    state: &'a StateCell<S>,
    reduced: &'a RefCell<Option<Arc<S>>>,
    dispatcher: &'a Dispatcher<S, A>,
}

impl<'a, S, A> MiddlewareApi<'a, S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    pub(crate) fn new(
        state: &'a StateCell<S>,
        reduced: &'a RefCell<Option<Arc<S>>>,
        dispatcher: &'a Dispatcher<S, A>,
    ) -> Self {
        Self {
            state,
            reduced,
            dispatcher,
        }
    }

    /// Current state
    ///
    /// After `next.run(..)` returned, this is the state produced by the
    /// reducer for this pass, which the store commits once the chain returns.
    pub fn get_state(&self) -> Arc<S> {
        match self.reduced.borrow().as_ref() {
            Some(state) => Arc::clone(state),
            None => read_state(self.state),
        }
    }

    /// Queue an action; it runs through the whole chain after this pass
    pub fn dispatch(&self, action: A) {
        self.dispatcher.dispatch(action);
    }

    /// Queue a thunk; it runs through the whole chain after this pass
    pub fn dispatch_thunk(&self, thunk: Thunk<S, A>) {
        self.dispatcher.dispatch_thunk(thunk);
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, A> {
        self.dispatcher
    }

    /// Context handed to thunks started from this pass
    pub fn thunk_context(&self) -> ThunkContext<S, A> {
        ThunkContext::new(self.dispatcher.clone(), Arc::clone(self.state))
    }
}

pub(crate) type Terminal<'a, S, A> = dyn Fn(Dispatchable<S, A>) -> Result<Dispatched> + 'a;

/// The remaining middleware chain, ending in the reducer
pub struct Next<'a, S, A> {
    chain: &'a [Box<dyn Middleware<S, A>>],
    api: &'a MiddlewareApi<'a, S, A>,
    terminal: &'a Terminal<'a, S, A>,
}

impl<'a, S, A> Next<'a, S, A> {
    pub(crate) fn new(
        chain: &'a [Box<dyn Middleware<S, A>>],
        api: &'a MiddlewareApi<'a, S, A>,
        terminal: &'a Terminal<'a, S, A>,
    ) -> Self {
        Self {
            chain,
            api,
            terminal,
        }
    }

    /// Continue with the next middleware, or the reducer at the end of the chain
    pub fn run(self, action: Dispatchable<S, A>) -> Result<Dispatched> {
        match self.chain.split_first() {
            Some((middleware, rest)) => {
                middleware.handle(action, self.api, Next::new(rest, self.api, self.terminal))
            }
            None => (self.terminal)(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DynAction;
    use crate::error::StoreError;
    use crate::reducer::update;
    use crate::store::Store;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: i64,
    }

    fn counter(state: &Arc<Counter>, action: &DynAction) -> Arc<Counter> {
        match action.action_type() {
            "INCREMENT" => update(state, |s| s.count += 1),
            "DECREMENT" => update(state, |s| s.count -= 1),
            _ => Arc::clone(state),
        }
    }

    /// Records the action types it sees, then forwards
    struct Recorder {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware<Counter, DynAction> for Recorder {
        fn handle(
            &self,
            action: Dispatchable<Counter, DynAction>,
            _api: &MiddlewareApi<'_, Counter, DynAction>,
            next: Next<'_, Counter, DynAction>,
        ) -> Result<Dispatched> {
            if let Dispatchable::Action(inner) = &action {
                self.seen
                    .lock()
                    .unwrap()
                    .push(format!("{}:{}", self.label, inner.action_type()));
            }
            next.run(action)
        }
    }

    /// Turns DECREMENT into INCREMENT
    struct Invert;

    impl Middleware<Counter, DynAction> for Invert {
        fn handle(
            &self,
            action: Dispatchable<Counter, DynAction>,
            _api: &MiddlewareApi<'_, Counter, DynAction>,
            next: Next<'_, Counter, DynAction>,
        ) -> Result<Dispatched> {
            match action {
                Dispatchable::Action(inner) if inner.action_type() == "DECREMENT" => {
                    next.run(Dispatchable::Action(DynAction::new("INCREMENT")))
                }
                other => next.run(other),
            }
        }
    }

    /// Swallows everything
    struct BlackHole;

    impl Middleware<Counter, DynAction> for BlackHole {
        fn handle(
            &self,
            _action: Dispatchable<Counter, DynAction>,
            _api: &MiddlewareApi<'_, Counter, DynAction>,
            _next: Next<'_, Counter, DynAction>,
        ) -> Result<Dispatched> {
            Ok(Dispatched::Swallowed)
        }
    }

    /// Fails after the reducer already ran
    struct FailAfterReduce;

    impl Middleware<Counter, DynAction> for FailAfterReduce {
        fn handle(
            &self,
            action: Dispatchable<Counter, DynAction>,
            api: &MiddlewareApi<'_, Counter, DynAction>,
            next: Next<'_, Counter, DynAction>,
        ) -> Result<Dispatched> {
            next.run(action)?;
            assert_eq!(api.get_state().count, 1);
            Err(StoreError::middleware(self.name(), "persistence unavailable"))
        }

        fn name(&self) -> &str {
            "fail-after-reduce"
        }
    }

    /// Dispatches a follow-up DECREMENT after every INCREMENT
    struct Echo;

    impl Middleware<Counter, DynAction> for Echo {
        fn handle(
            &self,
            action: Dispatchable<Counter, DynAction>,
            api: &MiddlewareApi<'_, Counter, DynAction>,
            next: Next<'_, Counter, DynAction>,
        ) -> Result<Dispatched> {
            if let Dispatchable::Action(inner) = &action {
                if inner.action_type() == "INCREMENT" {
                    api.dispatch(DynAction::new("DECREMENT"));
                }
            }
            next.run(action)
        }
    }

    #[test]
    fn test_middleware_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store: Store<Counter, DynAction> = Store::builder(counter, Counter { count: 0 })
            .add_middleware(Recorder {
                label: "first",
                seen: Arc::clone(&seen),
            })
            .add_middleware(Recorder {
                label: "second",
                seen: Arc::clone(&seen),
            })
            .build();

        store.dispatch(DynAction::new("INCREMENT")).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first:INCREMENT".to_string(), "second:INCREMENT".to_string()]
        );
    }

    #[test]
    fn test_middleware_can_transform() {
        let store: Store<Counter, DynAction> = Store::builder(counter, Counter { count: 0 })
            .add_middleware(Invert)
            .build();

        store.dispatch(DynAction::new("DECREMENT")).unwrap();

        assert_eq!(store.get_state().count, 1);
    }

    #[test]
    fn test_middleware_can_swallow() {
        let store: Store<Counter, DynAction> = Store::builder(counter, Counter { count: 0 })
            .add_middleware(BlackHole)
            .build();
        let before = store.get_state();

        let outcome = store.dispatch(DynAction::new("INCREMENT")).unwrap();

        assert!(matches!(outcome, Dispatched::Swallowed));
        assert!(Arc::ptr_eq(&before, &store.get_state()));
    }

    #[test]
    fn test_failing_middleware_leaves_state_untouched() {
        let store: Store<Counter, DynAction> = Store::builder(counter, Counter { count: 0 })
            .add_middleware(FailAfterReduce)
            .build();
        let before = store.get_state();

        let result = store.dispatch(DynAction::new("INCREMENT"));

        match result {
            Err(StoreError::Middleware { name, .. }) => assert_eq!(name, "fail-after-reduce"),
            other => panic!("expected middleware error, got {:?}", other),
        }
        assert!(Arc::ptr_eq(&before, &store.get_state()));
    }

    #[test]
    fn test_middleware_dispatch_runs_after_current_pass() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store: Store<Counter, DynAction> = Store::builder(counter, Counter { count: 0 })
            .add_middleware(Echo)
            .add_middleware(Recorder {
                label: "after-echo",
                seen: Arc::clone(&seen),
            })
            .build();

        store.dispatch(DynAction::new("INCREMENT")).unwrap();

        assert_eq!(store.get_state().count, 0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "after-echo:INCREMENT".to_string(),
                "after-echo:DECREMENT".to_string()
            ]
        );
    }
}
