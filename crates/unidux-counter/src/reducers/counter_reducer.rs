use crate::actions::CounterAction;
use crate::state::CounterState;
use std::sync::Arc;
use unidux::update;

/// Reducer for the counter slice
pub fn reduce(state: &Arc<CounterState>, action: &CounterAction) -> Arc<CounterState> {
    match action {
        CounterAction::Increment => match state.count.checked_add(state.step) {
            Some(count) => update(state, |s| s.count = count),
            None => Arc::clone(state),
        },
        CounterAction::Decrement => match state.count.checked_sub(state.step) {
            Some(count) => update(state, |s| s.count = count),
            None => Arc::clone(state),
        },
        CounterAction::Reset if state.count != 0 => update(state, |s| s.count = 0),
        _ => {
            // Unhandled actions - no state change
            Arc::clone(state)
        }
    }
}
