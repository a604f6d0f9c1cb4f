pub mod controller;
pub mod state;

pub use controller::TimerController;
pub use state::{next_completed, progress_percent, TimerPhase, TimerView};
