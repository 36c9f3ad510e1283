//! LoggingMiddleware - logs all actions for debugging

use super::{Dispatchable, Dispatched, Middleware, MiddlewareApi, Next};
use crate::action::Action;
use crate::error::Result;
use log::Level;

/// LoggingMiddleware - logs every dispatched value and what became of it
///
/// Always forwards; failures further down the chain are logged at warn level
/// and returned unchanged.
pub struct LoggingMiddleware {
    level: Level,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::with_level(Level::Debug)
    }

    pub fn with_level(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Middleware<S, A> for LoggingMiddleware
where
    S: Send + Sync + 'static,
    A: Action,
{
    fn handle(
        &self,
        action: Dispatchable<S, A>,
        _api: &MiddlewareApi<'_, S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Dispatched> {
        log::log!(self.level, "Action: {:?}", action);

        let result = next.run(action);
        match &result {
            Ok(outcome) => log::log!(self.level, "  -> {:?}", outcome),
            Err(err) => log::warn!("Action failed: {}", err),
        }
        result
    }

    fn name(&self) -> &str {
        "logging"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DynAction;
    use crate::error::StoreError;
    use crate::store::Store;
    use std::sync::Arc;

    fn count(state: &Arc<u32>, action: &DynAction) -> Arc<u32> {
        match action.action_type() {
            "TICK" => Arc::new(**state + 1),
            _ => Arc::clone(state),
        }
    }

    #[test]
    fn test_logging_middleware_forwards() {
        let store: Store<u32, DynAction> = Store::builder(count, 0)
            .add_middleware(LoggingMiddleware::with_level(Level::Info))
            .build();

        let outcome = store.dispatch(DynAction::new("TICK")).unwrap();

        assert!(outcome.changed());
        assert_eq!(*store.get_state(), 1);
    }

    #[test]
    fn test_invalid_action_never_reaches_chain() {
        let store: Store<u32, DynAction> = Store::builder(count, 0)
            .add_middleware(LoggingMiddleware::new())
            .build();

        let result = store.dispatch(DynAction::new(""));

        assert!(matches!(result, Err(StoreError::InvalidAction { .. })));
    }
}
