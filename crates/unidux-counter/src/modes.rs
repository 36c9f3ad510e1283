//! Which actions apply in which mode
//!
//! Requesting a quote while one is already loading is ignored, and load
//! results only count while a request is in flight.

use crate::state::Mode;
use unidux::TransitionTable;

const ALWAYS_ALLOWED: [&str; 4] = ["INCREMENT", "DECREMENT", "RESET", "QUIT"];

pub fn transition_table() -> TransitionTable<Mode> {
    let mut table = TransitionTable::new()
        .allow(Mode::Idle, "QUOTE_REQUESTED", Mode::Loading)
        .allow(Mode::Ready, "QUOTE_REQUESTED", Mode::Loading)
        .allow(Mode::Failed, "QUOTE_REQUESTED", Mode::Loading)
        .allow(Mode::Loading, "QUOTE_LOADED", Mode::Ready)
        .allow(Mode::Loading, "QUOTE_FAILED", Mode::Failed);

    for mode in [Mode::Idle, Mode::Loading, Mode::Ready, Mode::Failed] {
        for action_type in ALWAYS_ALLOWED {
            table = table.allow(mode, action_type, mode);
        }
    }
    table
}
