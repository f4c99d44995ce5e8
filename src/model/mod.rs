pub mod board;
pub mod config;
pub mod day;

pub use board::*;
pub use config::*;
pub use day::*;
