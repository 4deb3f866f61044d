//! Technical indicators over a bar slice.
//!
//! Everything here is a pure function of its input:
//! - `percent_change`: intraday move of the latest bar
//! - `sma`: trailing simple moving average
//! - `crossover`: golden/death cross between two SMA series

pub mod crossover;
pub mod percent_change;
pub mod sma;

pub use crossover::{detect_crossover, Crossover};
pub use percent_change::percent_change;
pub use sma::calculate_sma;
