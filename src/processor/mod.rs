pub mod chat_words;
pub mod date_filter;
pub mod key_combinations;
pub mod loader;
pub mod match_report;

pub use date_filter::*;
pub use key_combinations::*;
pub use loader::*;
pub use match_report::*;
