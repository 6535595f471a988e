mod config;
mod file_pattern;

pub use config::*;
pub use file_pattern::*;
