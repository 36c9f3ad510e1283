//! Predictable unidirectional state container
//!
//! This crate provides:
//! - Actions: tagged data describing intended state changes
//! - Reducers: pure `(state, action) -> state` functions, and `combine_reducers`
//!   to split a large state into independently reduced slices
//! - Store: the single source of truth with `dispatch`, `get_state` and `subscribe`
//! - Middleware: interceptors between dispatch and reducer (logging, thunks,
//!   mode guards, your own side effects)
//! - Mode guard: a transition table restricting which actions apply in which mode
//!
//! ```ignore
//! let store = Store::builder(reduce, AppState::default())
//!     .add_middleware(LoggingMiddleware::new())
//!     .add_middleware(ThunkMiddleware::new())
//!     .build();
//!
//! let _subscription = store.subscribe(|state| render(state));
//! store.dispatch(AppAction::Increment)?;
//! ```

pub mod action;
pub mod error;
pub mod fsm;
pub mod middleware;
pub mod reducer;
pub mod store;

pub use action::{action_creator, Action, DynAction};
pub use error::{Result, StoreError};
pub use fsm::{Guarded, Modal, TransitionGuard, TransitionTable};
pub use middleware::{
    Dispatchable, Dispatched, Dispatcher, LoggingMiddleware, Middleware, MiddlewareApi, Next,
    Thunk, ThunkContext, ThunkHandle, ThunkMiddleware,
};
pub use reducer::{combine_reducers, update, CombineReducers, CombinedState, Reducer};
pub use store::{create_store, Store, StoreBuilder, Subscription};
