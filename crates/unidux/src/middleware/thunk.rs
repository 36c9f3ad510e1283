//! Thunks - deferred functions dispatched in place of plain actions
//!
//! A thunk is a closure that receives a [`ThunkContext`] and returns a future.
//! The closure itself runs synchronously when the thunk reaches
//! [`ThunkMiddleware`], so work done before the first `.await` (like
//! dispatching a "started" action) happens in program order. The returned
//! future is spawned on the current tokio runtime and typically dispatches
//! follow-up actions once its I/O completed.
//!
//! ```ignore
//! let load = Thunk::named("load_quote", |ctx: ThunkContext<AppState, AppAction>| {
//!     ctx.dispatch(AppAction::QuoteRequested);
//!     async move {
//!         let quote = fetch_quote().await?;
//!         ctx.dispatch(AppAction::QuoteLoaded(quote));
//!         Ok(())
//!     }
//! });
//! store.dispatch_thunk(load)?;
//! ```
//!
//! Follow-up actions travel through the store's deferred queue, so anything
//! dispatched synchronously before a follow-up was queued reaches the reducer
//! first.

use super::{Dispatched, Dispatcher, Middleware, MiddlewareApi, Next};
use crate::action::Action;
use crate::error::{Result, StoreError};
use crate::store::{read_state, StateCell};
use futures::FutureExt;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// BoxFuture type alias for thunk bodies
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type ThunkFn<S, A> =
    Box<dyn FnOnce(ThunkContext<S, A>) -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// Anything the store accepts: a plain action or a thunk
pub enum Dispatchable<S, A> {
    Action(A),
    Thunk(Thunk<S, A>),
}

impl<S, A> From<Thunk<S, A>> for Dispatchable<S, A> {
    fn from(thunk: Thunk<S, A>) -> Self {
        Dispatchable::Thunk(thunk)
    }
}

impl<S, A: fmt::Debug> fmt::Debug for Dispatchable<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatchable::Action(action) => fmt::Debug::fmt(action, f),
            Dispatchable::Thunk(thunk) => fmt::Debug::fmt(thunk, f),
        }
    }
}

/// A deferred, possibly asynchronous action creator
pub struct Thunk<S, A> {
    label: Cow<'static, str>,
    run: ThunkFn<S, A>,
}

impl<S, A> Thunk<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(ThunkContext<S, A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::named("thunk", f)
    }

    /// Create a thunk with a label used in logs and errors
    pub fn named<F, Fut>(label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(ThunkContext<S, A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            label: label.into(),
            run: Box::new(move |ctx| Box::pin(f(ctx))),
        }
    }
}

impl<S, A> Thunk<S, A> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the closure, returning the continuation
    fn start(self, ctx: ThunkContext<S, A>) -> BoxFuture<'static, anyhow::Result<()>> {
        (self.run)(ctx)
    }
}

impl<S, A> fmt::Debug for Thunk<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Thunk").field(&self.label).finish()
    }
}

/// What a running thunk can do with the store
pub struct ThunkContext<S, A> {
    dispatcher: Dispatcher<S, A>,
    state: StateCell<S>,
}

impl<S, A> ThunkContext<S, A> {
    pub(crate) fn new(dispatcher: Dispatcher<S, A>, state: StateCell<S>) -> Self {
        Self { dispatcher, state }
    }

    /// Latest committed state
    pub fn get_state(&self) -> Arc<S> {
        read_state(&self.state)
    }

    pub fn dispatch(&self, action: A) {
        self.dispatcher.dispatch(action);
    }

    pub fn dispatch_thunk(&self, thunk: Thunk<S, A>) {
        self.dispatcher.dispatch_thunk(thunk);
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, A> {
        &self.dispatcher
    }
}

impl<S, A> Clone for ThunkContext<S, A> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

/// Handle to a spawned thunk continuation
#[derive(Debug)]
pub struct ThunkHandle {
    handle: JoinHandle<Result<()>>,
}

impl ThunkHandle {
    /// Wait for the continuation to finish
    ///
    /// A failing, panicking or aborted continuation yields
    /// [`StoreError::Middleware`].
    pub async fn join(self) -> Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(StoreError::middleware("thunk", e)),
        }
    }

    /// Abort the continuation; follow-up actions it did not dispatch yet are lost
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

type ErrorHandler = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// ThunkMiddleware - runs thunks, forwards plain actions
///
/// Continuation failures, panics included, are returned from
/// [`ThunkHandle::join`] and also reported to the error handler, which logs
/// them by default.
pub struct ThunkMiddleware {
    on_error: ErrorHandler,
}

impl ThunkMiddleware {
    pub fn new() -> Self {
        Self::with_error_handler(|err| log::error!("{}", err))
    }

    pub fn with_error_handler(handler: impl Fn(&StoreError) + Send + Sync + 'static) -> Self {
        Self {
            on_error: Arc::new(handler),
        }
    }
}

impl Default for ThunkMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Middleware<S, A> for ThunkMiddleware
where
    S: Send + Sync + 'static,
    A: Action,
{
    fn handle(
        &self,
        action: Dispatchable<S, A>,
        api: &MiddlewareApi<'_, S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Dispatched> {
        let thunk = match action {
            Dispatchable::Thunk(thunk) => thunk,
            other => return next.run(other),
        };

        let runtime = Handle::try_current().map_err(|e| StoreError::middleware("thunk", e))?;

        let label = thunk.label().to_string();
        log::debug!("Starting thunk `{}`", label);
        let continuation = thunk.start(api.thunk_context());

        let on_error = Arc::clone(&self.on_error);
        let handle = runtime.spawn(async move {
            let name = format!("thunk:{}", label);
            let result = match AssertUnwindSafe(continuation).catch_unwind().await {
                Ok(result) => result.map_err(|e| StoreError::middleware(name, e)),
                Err(panic) => Err(StoreError::middleware(name, panic_message(panic))),
            };
            if let Err(err) = &result {
                on_error(err);
            }
            result
        });

        Ok(Dispatched::Spawned(ThunkHandle { handle }))
    }

    fn name(&self) -> &str {
        "thunk"
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "unknown cause".to_string(),
        },
    };
    format!("panicked: {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DynAction;
    use crate::reducer::update;
    use crate::store::Store;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Log {
        entries: Vec<String>,
    }

    fn record(state: &Arc<Log>, action: &DynAction) -> Arc<Log> {
        match action.action_type() {
            "RECORD" => update(state, |s| {
                s.entries.push(action.payload_as().unwrap_or_default())
            }),
            _ => Arc::clone(state),
        }
    }

    fn store() -> Store<Log, DynAction> {
        Store::builder(record, Log { entries: vec![] })
            .add_middleware(ThunkMiddleware::new())
            .build()
    }

    fn record_action(entry: &str) -> DynAction {
        DynAction::new("RECORD").with_payload(entry)
    }

    #[tokio::test]
    async fn test_sync_action_lands_before_slow_thunk_follow_up() {
        let store = store();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let _subscription = store.subscribe(move |state: &Arc<Log>| {
            sink.lock().unwrap().push(state.entries.clone());
        });

        let thunk = Thunk::new(|ctx: ThunkContext<Log, DynAction>| async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ctx.dispatch(record_action("from-thunk"));
            Ok(())
        });
        let outcome = store.dispatch_thunk(thunk).unwrap();
        store.dispatch(record_action("sync")).unwrap();

        let Dispatched::Spawned(handle) = outcome else {
            panic!("expected thunk to be spawned");
        };
        handle.join().await.unwrap();
        store.process_next().await.unwrap().unwrap();

        assert_eq!(
            *observed.lock().unwrap(),
            vec![
                vec!["sync".to_string()],
                vec!["sync".to_string(), "from-thunk".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_thunk_body_runs_synchronously_at_dispatch() {
        let store = store();

        let thunk = Thunk::named("started", |ctx: ThunkContext<Log, DynAction>| {
            ctx.dispatch(record_action("started"));
            async { Ok(()) }
        });
        store.dispatch_thunk(thunk).unwrap();

        assert_eq!(store.get_state().entries, vec!["started".to_string()]);
    }

    #[tokio::test]
    async fn test_thunk_reads_latest_state() {
        let store = store();
        store.dispatch(record_action("first")).unwrap();

        let thunk = Thunk::new(|ctx: ThunkContext<Log, DynAction>| async move {
            let count = ctx.get_state().entries.len();
            ctx.dispatch(record_action(&format!("seen {}", count)));
            Ok(())
        });
        let Dispatched::Spawned(handle) = store.dispatch_thunk(thunk).unwrap() else {
            panic!("expected thunk to be spawned");
        };
        handle.join().await.unwrap();
        store.process_next().await.unwrap().unwrap();

        assert_eq!(
            store.get_state().entries,
            vec!["first".to_string(), "seen 1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failing_thunk_reports_error() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let store: Store<Log, DynAction> = Store::builder(record, Log { entries: vec![] })
            .add_middleware(ThunkMiddleware::with_error_handler(move |err| {
                sink.lock().unwrap().push(err.to_string());
            }))
            .build();
        let before = store.get_state();

        let thunk = Thunk::named("explode", |_ctx: ThunkContext<Log, DynAction>| async {
            Err(anyhow::anyhow!("upstream timed out"))
        });
        let Dispatched::Spawned(handle) = store.dispatch_thunk(thunk).unwrap() else {
            panic!("expected thunk to be spawned");
        };

        let result = handle.join().await;

        assert!(matches!(result, Err(StoreError::Middleware { .. })));
        assert_eq!(
            *reported.lock().unwrap(),
            vec!["Middleware `thunk:explode` failed: upstream timed out".to_string()]
        );
        assert!(Arc::ptr_eq(&before, &store.get_state()));
    }

    #[tokio::test]
    async fn test_panicking_queued_thunk_reports_error() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let store: Store<Log, DynAction> = Store::builder(record, Log { entries: vec![] })
            .add_middleware(ThunkMiddleware::with_error_handler(move |err| {
                sink.lock().unwrap().push(err.to_string());
            }))
            .build();

        let thunk = Thunk::named("boom", |ctx: ThunkContext<Log, DynAction>| async move {
            if ctx.get_state().entries.is_empty() {
                panic!("no entries yet");
            }
            Ok(())
        });
        store.dispatcher().dispatch_thunk(thunk);
        assert_eq!(store.process_pending(), 1);

        for _ in 0..50 {
            if !reported.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(
            *reported.lock().unwrap(),
            vec!["Middleware `thunk:boom` failed: panicked: no entries yet".to_string()]
        );
    }

    #[tokio::test]
    async fn test_panicking_thunk_join_returns_error() {
        let store = store();
        let thunk = Thunk::new(|_ctx: ThunkContext<Log, DynAction>| async {
            let entries: Vec<String> = Vec::new();
            if entries.is_empty() {
                panic!("nothing to read");
            }
            Ok(())
        });
        let Dispatched::Spawned(handle) = store.dispatch_thunk(thunk).unwrap() else {
            panic!("expected thunk to be spawned");
        };

        let result = handle.join().await;

        assert!(matches!(
            result,
            Err(StoreError::Middleware { ref name, .. }) if name == "thunk:thunk"
        ));
    }

    #[test]
    fn test_thunk_without_runtime_fails() {
        let store = store();
        let thunk = Thunk::new(|_ctx: ThunkContext<Log, DynAction>| async { Ok(()) });

        let result = store.dispatch_thunk(thunk);

        assert!(matches!(result, Err(StoreError::Middleware { .. })));
    }

    #[test]
    fn test_thunk_without_middleware_is_invalid() {
        let store: Store<Log, DynAction> = Store::builder(record, Log { entries: vec![] }).build();
        let thunk = Thunk::new(|_ctx: ThunkContext<Log, DynAction>| async { Ok(()) });

        let result = store.dispatch_thunk(thunk);

        assert!(matches!(result, Err(StoreError::InvalidAction { .. })));
    }
}
