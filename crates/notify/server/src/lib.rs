pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::log_filter;
