pub mod counter_reducer;
pub mod quote_reducer;
