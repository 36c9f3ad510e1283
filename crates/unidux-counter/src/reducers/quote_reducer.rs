use crate::actions::CounterAction;
use crate::state::QuoteState;
use std::sync::Arc;
use unidux::update;

/// Reducer for the quote slice
pub fn reduce(state: &Arc<QuoteState>, action: &CounterAction) -> Arc<QuoteState> {
    match action {
        CounterAction::QuoteRequested => update(state, |s| {
            s.requests += 1;
            s.last_error = None;
        }),
        CounterAction::QuoteLoaded(quote) => update(state, |s| s.current = Some(quote.clone())),
        CounterAction::QuoteFailed(reason) => {
            update(state, |s| s.last_error = Some(reason.clone()))
        }
        _ => Arc::clone(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failure_keeps_previous_quote() {
        let state = Arc::new(QuoteState::default());
        let state = reduce(&state, &CounterAction::QuoteRequested);
        let state = reduce(&state, &CounterAction::QuoteLoaded("first".into()));
        let state = reduce(&state, &CounterAction::QuoteRequested);
        let state = reduce(&state, &CounterAction::QuoteFailed("timeout".into()));

        assert_eq!(
            *state,
            QuoteState {
                current: Some("first".into()),
                last_error: Some("timeout".into()),
                requests: 2,
            }
        );
    }

    #[test]
    fn test_new_request_clears_error() {
        let state = Arc::new(QuoteState {
            last_error: Some("timeout".into()),
            ..Default::default()
        });
        let state = reduce(&state, &CounterAction::QuoteRequested);
        assert_eq!(state.last_error, None);
    }
}
