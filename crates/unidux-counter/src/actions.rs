//! Actions of the counter application
//!
//! The type tag of every action is its variant name in SCREAMING_SNAKE_CASE,
//! which is what the mode transition table refers to.

use unidux::Action;

#[derive(Debug, Clone, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAction {
    /// Raw input line, translated by the CommandMiddleware
    CommandEntered(String),

    Increment,
    Decrement,
    Reset,

    /// A quote was requested; the QuoteMiddleware starts the fetch
    QuoteRequested,
    QuoteLoaded(String),
    QuoteFailed(String),

    Quit,
}

impl Action for CounterAction {
    fn action_type(&self) -> &str {
        let tag: &'static str = self.into();
        tag
    }
}
