use std::sync::Arc;
use unidux::Modal;

/// What the application is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterState {
    pub count: i64,
    pub step: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteState {
    pub current: Option<String>,
    pub last_error: Option<String>,
    pub requests: u32,
}

/// Application state - the whole state tree
///
/// Slices live behind `Arc` so that untouched slices keep their identity
/// across dispatches.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub running: bool,
    pub mode: Mode,
    pub counter: Arc<CounterState>,
    pub quote: Arc<QuoteState>,
}

impl AppState {
    pub fn new(initial_count: i64, step: i64) -> Self {
        Self {
            running: true,
            mode: Mode::Idle,
            counter: Arc::new(CounterState {
                count: initial_count,
                step,
            }),
            quote: Arc::new(QuoteState::default()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl Modal for AppState {
    type Mode = Mode;

    fn mode(&self) -> &Mode {
        &self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }
}
