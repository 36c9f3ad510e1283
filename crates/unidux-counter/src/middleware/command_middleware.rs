//! CommandMiddleware - translates input lines into application actions
//!
//! `CommandEntered` never reaches the reducer: it is either replaced by the
//! action the command stands for, or handled here and swallowed.

use crate::actions::CounterAction;
use crate::commands::{parse_command, Command, HELP};
use crate::state::AppState;
use crate::view::render;
use unidux::{Dispatchable, Dispatched, Middleware, MiddlewareApi, Next};

pub struct CommandMiddleware;

impl CommandMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommandMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware<AppState, CounterAction> for CommandMiddleware {
    fn handle(
        &self,
        action: Dispatchable<AppState, CounterAction>,
        api: &MiddlewareApi<'_, AppState, CounterAction>,
        next: Next<'_, AppState, CounterAction>,
    ) -> unidux::Result<Dispatched> {
        let line = match action {
            Dispatchable::Action(CounterAction::CommandEntered(line)) => line,
            other => return next.run(other),
        };

        match parse_command(&line) {
            Some(Command::Dispatch(action)) => next.run(Dispatchable::Action(action)),
            Some(Command::PrintState) => {
                println!("{}", render(&api.get_state()));
                Ok(Dispatched::Swallowed)
            }
            Some(Command::Help) => {
                println!("{}", HELP);
                Ok(Dispatched::Swallowed)
            }
            None if line.trim().is_empty() => Ok(Dispatched::Swallowed),
            None => {
                log::debug!("Unknown command: {:?}", line);
                println!("unknown command `{}`, try `help`", line.trim());
                Ok(Dispatched::Swallowed)
            }
        }
    }

    fn name(&self) -> &str {
        "command"
    }
}
