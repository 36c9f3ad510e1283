//! QuoteMiddleware - starts a quote fetch for every accepted request
//!
//! Sits behind the TransitionGuard, so it only sees `QuoteRequested` when no
//! other request is in flight.

use crate::actions::CounterAction;
use crate::quote_service::QuoteService;
use crate::state::AppState;
use std::sync::Arc;
use unidux::{Dispatchable, Dispatched, Middleware, MiddlewareApi, Next, Thunk, ThunkContext};

pub struct QuoteMiddleware {
    service: Arc<QuoteService>,
}

impl QuoteMiddleware {
    pub fn new(service: Arc<QuoteService>) -> Self {
        Self { service }
    }
}

impl Middleware<AppState, CounterAction> for QuoteMiddleware {
    fn handle(
        &self,
        action: Dispatchable<AppState, CounterAction>,
        api: &MiddlewareApi<'_, AppState, CounterAction>,
        next: Next<'_, AppState, CounterAction>,
    ) -> unidux::Result<Dispatched> {
        if !matches!(action, Dispatchable::Action(CounterAction::QuoteRequested)) {
            return next.run(action);
        }

        // Let the reducer enter Loading first, then start the fetch
        let outcome = next.run(action)?;
        api.dispatch_thunk(load_quote(Arc::clone(&self.service)));
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "quote"
    }
}

/// Thunk fetching one quote and dispatching the result
pub fn load_quote(service: Arc<QuoteService>) -> Thunk<AppState, CounterAction> {
    Thunk::named(
        "load_quote",
        move |ctx: ThunkContext<AppState, CounterAction>| async move {
            match service.fetch().await {
                Ok(quote) => ctx.dispatch(CounterAction::QuoteLoaded(quote)),
                Err(e) => {
                    log::warn!("Quote request failed: {:#}", e);
                    ctx.dispatch(CounterAction::QuoteFailed(e.to_string()));
                }
            }
            Ok(())
        },
    )
}
