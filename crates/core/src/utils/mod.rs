pub mod period;
pub mod time_utils;

pub use period::Period;
