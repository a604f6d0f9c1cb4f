pub mod controller;
pub mod state;

pub use controller::{system_clock, Clock, Stopwatch};
pub use state::{format_hms, StopwatchEntry, StopwatchState};
