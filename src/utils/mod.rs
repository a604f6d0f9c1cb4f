pub mod dir;
pub mod logging;

pub use logging::init_logging;
