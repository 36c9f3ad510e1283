use crate::state::AppState;

/// One-line rendering of the state
pub fn render(state: &AppState) -> String {
    let mut line = format!(
        "count={} mode={:?} requests={}",
        state.counter.count, state.mode, state.quote.requests
    );
    if let Some(quote) = &state.quote.current {
        line.push_str(&format!(" quote=\"{}\"", quote));
    }
    if let Some(error) = &state.quote.last_error {
        line.push_str(&format!(" error=\"{}\"", error));
    }
    line
}
