//! Application middleware
//!
//! Registered in `store::build_store`, in this order:
//! 1. `LoggingMiddleware` (from unidux) - logs everything
//! 2. `CommandMiddleware` - translates input lines into actions
//! 3. `TransitionGuard` (from unidux) - drops actions not allowed in the current mode
//! 4. `ThunkMiddleware` (from unidux) - runs thunks
//! 5. `QuoteMiddleware` - starts quote fetches

pub mod command_middleware;
pub mod quote_middleware;
