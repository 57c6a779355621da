#![forbid(unsafe_code)]

pub mod abbreviation;
pub mod catalog;
pub mod evaluator;
pub mod model;
pub mod time;
pub mod timer;

pub use time::Clock;
