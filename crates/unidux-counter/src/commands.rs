//! Input commands and their translation into actions

use crate::actions::CounterAction;

pub const HELP: &str = "\
commands:
  inc, +     increment the counter
  dec, -     decrement the counter
  reset      set the counter to zero
  load       fetch a quote in the background
  state      print the current state
  help       show this help
  quit, q    exit";

/// What an input line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(CounterAction),
    PrintState,
    Help,
}

/// Parse one input line; blank lines and unknown words yield `None`
pub fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim().to_lowercase().as_str() {
        "inc" | "+" => Command::Dispatch(CounterAction::Increment),
        "dec" | "-" => Command::Dispatch(CounterAction::Decrement),
        "reset" => Command::Dispatch(CounterAction::Reset),
        "load" => Command::Dispatch(CounterAction::QuoteRequested),
        "quit" | "q" => Command::Dispatch(CounterAction::Quit),
        "state" => Command::PrintState,
        "help" | "?" => Command::Help,
        _ => return None,
    };
    Some(command)
}
