use chrono::{Datelike, NaiveDate};

mod day;
pub use day::*;
mod duration;
pub use duration::*;

/// The ISO 8601 week number (1..=53) of the given day.
#[must_use]
pub fn iso_week_number(day: NaiveDate) -> u32 {
    day.iso_week().week()
}
