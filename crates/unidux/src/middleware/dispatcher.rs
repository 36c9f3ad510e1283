//! Dispatcher allows middleware, listeners and thunks to dispatch actions back to the store

use super::thunk::{Dispatchable, Thunk};
use std::fmt;
use tokio::sync::mpsc;

/// Deferred dispatch handle
///
/// Actions dispatched through the Dispatcher are queued and re-enter the
/// middleware chain from the beginning once the store is idle: right after the
/// current dispatch pass, or when the owner calls `Store::process_next`.
/// This is the way to dispatch from code that runs while a dispatch is in
/// progress, and from other tasks.
pub struct Dispatcher<S, A> {
    tx: mpsc::UnboundedSender<Dispatchable<S, A>>,
}

impl<S, A> Dispatcher<S, A> {
    /// Create a new dispatcher
    pub fn new(tx: mpsc::UnboundedSender<Dispatchable<S, A>>) -> Self {
        Self { tx }
    }

    /// Dispatch an action
    pub fn dispatch(&self, action: A) {
        self.send(Dispatchable::Action(action));
    }

    /// Dispatch a thunk
    pub fn dispatch_thunk(&self, thunk: Thunk<S, A>) {
        self.send(Dispatchable::Thunk(thunk));
    }

    /// Whether the store behind this dispatcher is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, item: Dispatchable<S, A>) {
        if let Err(e) = self.tx.send(item) {
            log::error!("Failed to dispatch action: {}", e);
        }
    }
}

impl<S, A> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S, A> fmt::Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
