mod cell;
mod entry;
mod week_bucket;

pub use cell::*;
pub use entry::*;
pub use week_bucket::*;
