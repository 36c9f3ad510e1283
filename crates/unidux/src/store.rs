//! Store - holds application state and manages the dispatch loop
//!
//! ```text
//! dispatch(action) → Middleware Chain → Reducer → commit → Listeners
//!                                                            ↓
//!                         Dispatcher queue (deferred dispatches, FIFO)
//! ```
//!
//! The store is the single source of truth: state only ever changes through
//! `dispatch`, and every change replaces the whole state `Arc`.
//!
//! # Threading
//!
//! The store expects a single logical thread of control. It is `Send + Sync`
//! so that handles can live in tokio tasks, but dispatch passes never overlap:
//! a `dispatch` issued while another one is in progress (from the reducer, a
//! listener, or a different thread) fails with
//! [`StoreError::ReentrantDispatch`]. Code that needs to dispatch from such
//! places uses the [`Dispatcher`], whose actions are applied once the store
//! is idle.

use crate::action::{validate, Action};
use crate::error::{Result, StoreError};
use crate::middleware::{
    Dispatchable, Dispatched, Dispatcher, Middleware, MiddlewareApi, Next, Thunk,
};
use crate::reducer::Reducer;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tokio::sync::mpsc;

/// Shared cell holding the current state snapshot
pub(crate) type StateCell<S> = Arc<RwLock<Arc<S>>>;

pub(crate) fn read_state<S>(cell: &StateCell<S>) -> Arc<S> {
    Arc::clone(&cell.read().unwrap_or_else(PoisonError::into_inner))
}

type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(&StoreError) + Send + Sync>;

struct Listeners<S> {
    next_id: u64,
    entries: Vec<(u64, Listener<S>)>,
}

/// Handle returned by [`Store::subscribe`]
pub struct Subscription<S> {
    id: u64,
    listeners: Weak<Mutex<Listeners<S>>>,
}

impl<S> Subscription<S> {
    /// Stop receiving notifications
    ///
    /// A notification round that is already running still reaches this listener.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut listeners = listeners.lock().unwrap_or_else(PoisonError::into_inner);
            listeners.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Marks a dispatch pass as in progress; cleared on drop, also when unwinding
struct DispatchGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DispatchGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StoreError::ReentrantDispatch)?;
        Ok(Self { flag })
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

struct Inner<S, A> {
    state: StateCell<S>,
    reducer: RwLock<Box<dyn Reducer<S, A>>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    listeners: Arc<Mutex<Listeners<S>>>,
    dispatching: AtomicBool,
    dispatcher: Dispatcher<S, A>,
    queue: tokio::sync::Mutex<mpsc::UnboundedReceiver<Dispatchable<S, A>>>,
    on_error: ErrorHandler,
}

/// Store - owns the current state, the reducer and the middleware chain
///
/// Cloning a `Store` yields another handle to the same store.
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for a [`Store`]; middleware are fixed once the store is built
pub struct StoreBuilder<S, A> {
    initial_state: S,
    reducer: Box<dyn Reducer<S, A>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    on_error: Option<ErrorHandler>,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    /// Add middleware to the store
    ///
    /// Middleware is called in the order it was added.
    pub fn add_middleware<M: Middleware<S, A> + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Handler for failures of deferred dispatches, which have no caller to return to
    ///
    /// Defaults to logging the error.
    pub fn on_error(mut self, handler: impl Fn(&StoreError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Store<S, A> {
        let (tx, rx) = mpsc::unbounded_channel();
        let on_error = self.on_error.unwrap_or_else(|| {
            Arc::new(|err: &StoreError| log::error!("Deferred dispatch failed: {}", err))
        });

        Store {
            inner: Arc::new(Inner {
                state: Arc::new(RwLock::new(Arc::new(self.initial_state))),
                reducer: RwLock::new(self.reducer),
                middleware: self.middleware,
                listeners: Arc::new(Mutex::new(Listeners {
                    next_id: 0,
                    entries: Vec::new(),
                })),
                dispatching: AtomicBool::new(false),
                dispatcher: Dispatcher::new(tx),
                queue: tokio::sync::Mutex::new(rx),
                on_error,
            }),
        }
    }
}

/// Create a store without middleware
///
/// The initial state is used as-is; the reducer is not invoked until the
/// first dispatch.
pub fn create_store<S, A, R>(reducer: R, initial_state: S) -> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
    R: Reducer<S, A> + 'static,
{
    Store::builder(reducer, initial_state).build()
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    pub fn builder<R: Reducer<S, A> + 'static>(reducer: R, initial_state: S) -> StoreBuilder<S, A> {
        StoreBuilder {
            initial_state,
            reducer: Box::new(reducer),
            middleware: Vec::new(),
            on_error: None,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> Arc<S> {
        read_state(&self.inner.state)
    }

    /// Get the dispatcher for deferred dispatches
    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        self.inner.dispatcher.clone()
    }

    /// Process an action through middleware chain and reducer
    ///
    /// After this returns `Ok`, `get_state` observes the new state and all
    /// listeners were notified. Actions queued on the dispatcher meanwhile are
    /// processed before returning.
    pub fn dispatch(&self, action: A) -> Result<Dispatched> {
        self.dispatch_any(Dispatchable::Action(action))
    }

    /// Dispatch a thunk; requires a `ThunkMiddleware` in the chain
    pub fn dispatch_thunk(&self, thunk: Thunk<S, A>) -> Result<Dispatched> {
        self.dispatch_any(Dispatchable::Thunk(thunk))
    }

    pub fn dispatch_any(&self, action: Dispatchable<S, A>) -> Result<Dispatched> {
        let result = self.run_pass(action);
        if !matches!(result, Err(StoreError::ReentrantDispatch)) {
            self.process_pending();
        }
        result
    }

    /// Register a listener called after every dispatch that changed the state
    ///
    /// Listeners run synchronously in registration order, after the new state
    /// was committed. They must not call `dispatch` directly; use the
    /// [`Dispatcher`] instead.
    pub fn subscribe(&self, listener: impl Fn(&Arc<S>) + Send + Sync + 'static) -> Subscription<S> {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.inner.listeners),
        }
    }

    /// Swap the reducer, e.g. after loading more of the application
    pub fn replace_reducer<R: Reducer<S, A> + 'static>(&self, reducer: R) -> Result<()> {
        let _guard = DispatchGuard::acquire(&self.inner.dispatching)?;
        *self
            .inner
            .reducer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Box::new(reducer);
        log::debug!("Reducer replaced");
        Ok(())
    }

    /// Apply everything queued on the dispatcher, without waiting
    ///
    /// Returns the number of processed items. Failures are reported to the
    /// store's error handler.
    pub fn process_pending(&self) -> usize {
        if self.inner.dispatching.load(Ordering::Acquire) {
            return 0;
        }
        // Someone is waiting in `process_next` and will pick the items up
        let Ok(mut queue) = self.inner.queue.try_lock() else {
            return 0;
        };

        let mut processed = 0;
        while let Ok(item) = queue.try_recv() {
            processed += 1;
            if let Err(err) = self.run_pass(item) {
                (self.inner.on_error)(&err);
            }
        }
        processed
    }

    /// Wait for the next queued item and dispatch it
    ///
    /// Meant for the owner's event loop, e.g. inside `tokio::select!`, to
    /// apply follow-up actions of thunks as they arrive.
    ///
    /// The item is taken off the queue before it is dispatched. If another
    /// thread is dispatching at that moment, the result is
    /// `Err(ReentrantDispatch)` and the item is dropped; putting it back
    /// would reorder it behind later items.
    pub async fn process_next(&self) -> Option<Result<Dispatched>> {
        let item = {
            let mut queue = self.inner.queue.lock().await;
            queue.recv().await?
        };
        Some(self.dispatch_any(item))
    }

    /// One pass through middleware and reducer; commits only on success
    fn run_pass(&self, action: Dispatchable<S, A>) -> Result<Dispatched> {
        let guard = DispatchGuard::acquire(&self.inner.dispatching)?;

        if let Dispatchable::Action(action) = &action {
            validate(action)?;
            log::trace!("Dispatching {}", action.action_type());
        }

        let reduced: RefCell<Option<Arc<S>>> = RefCell::new(None);
        let api = MiddlewareApi::new(&self.inner.state, &reduced, &self.inner.dispatcher);

        let terminal = |action: Dispatchable<S, A>| -> Result<Dispatched> {
            let action = match action {
                Dispatchable::Action(action) => action,
                Dispatchable::Thunk(thunk) => {
                    return Err(StoreError::invalid_action(format!(
                        "{:?} reached the reducer, add a ThunkMiddleware to run thunks",
                        thunk
                    )));
                }
            };
            validate(&action)?;

            let current = self.get_state();
            let next = self
                .inner
                .reducer
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .reduce(&current, &action)?;
            let changed = !Arc::ptr_eq(&current, &next);
            *reduced.borrow_mut() = Some(next);
            Ok(Dispatched::Reduced { changed })
        };

        let outcome = Next::new(&self.inner.middleware, &api, &terminal).run(action)?;

        let next = reduced.borrow_mut().take();
        if let Some(next) = next {
            if self.commit(&next) {
                self.notify(&next);
            }
        }
        drop(guard);

        Ok(outcome)
    }

    /// Replace the current state; returns whether the reference changed
    fn commit(&self, next: &Arc<S>) -> bool {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if Arc::ptr_eq(&state, next) {
            return false;
        }
        *state = Arc::clone(next);
        true
    }

    fn notify(&self, state: &Arc<S>) {
        let listeners: Vec<Listener<S>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(state);
        }
    }
}
