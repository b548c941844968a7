pub mod logging;
pub mod report_config;

pub use logging::*;
pub use report_config::*;
