pub mod input;
pub mod schedule;
pub mod time;
