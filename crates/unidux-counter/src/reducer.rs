use crate::actions::CounterAction;
use crate::reducers::{counter_reducer, quote_reducer};
use crate::state::AppState;
use std::sync::Arc;
use unidux::update;

/// Reducer - pure function that produces new state from current state + action
/// This is the root reducer that orchestrates all sub-reducers
///
/// Mode changes are applied by the `Guarded` wrapper around this reducer.
pub fn reduce(state: &Arc<AppState>, action: &CounterAction) -> Arc<AppState> {
    if let CounterAction::Quit = action {
        return update(state, |s| s.running = false);
    }

    let counter = counter_reducer::reduce(&state.counter, action);
    let quote = quote_reducer::reduce(&state.quote, action);

    if Arc::ptr_eq(&counter, &state.counter) && Arc::ptr_eq(&quote, &state.quote) {
        return Arc::clone(state);
    }
    update(state, |s| {
        s.counter = counter;
        s.quote = quote;
    })
}
