use crate::actions::CounterAction;
use crate::middleware::command_middleware::CommandMiddleware;
use crate::middleware::quote_middleware::QuoteMiddleware;
use crate::modes::transition_table;
use crate::quote_service::QuoteService;
use crate::reducer;
use crate::state::AppState;
use std::sync::Arc;
use unidux::{Guarded, LoggingMiddleware, Store, ThunkMiddleware, TransitionGuard};
use unidux_config::AppConfig;

/// Build the application store with its middleware chain
///
/// Middleware execute in the order they are added.
pub fn build_store(config: &AppConfig) -> Store<AppState, CounterAction> {
    let table = Arc::new(transition_table());
    let service = Arc::new(QuoteService::from_config(config));
    let initial_state = AppState::new(config.initial_count, config.step);

    Store::builder(Guarded::new(Arc::clone(&table), reducer::reduce), initial_state)
        .add_middleware(LoggingMiddleware::new())
        .add_middleware(CommandMiddleware::new())
        .add_middleware(TransitionGuard::new(table))
        .add_middleware(ThunkMiddleware::new())
        .add_middleware(QuoteMiddleware::new(service))
        .build()
}
