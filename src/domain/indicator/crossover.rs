//! Moving-average crossover detection.
//!
//! Composes two SMA series; not an indicator in its own right.
//!
//! - Golden cross at i: `short[i-1] <= long[i-1]` and `short[i] > long[i]`
//! - Death cross at i:  `short[i-1] >= long[i-1]` and `short[i] < long[i]`
//!
//! Both require `i >= 1` and all four values defined.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    Golden,
    Death,
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crossover::Golden => write!(f, "golden cross"),
            Crossover::Death => write!(f, "death cross"),
        }
    }
}

pub fn detect_crossover(
    short: &[Option<f64>],
    long: &[Option<f64>],
    index: usize,
) -> Option<Crossover> {
    if index == 0 || index >= short.len() || index >= long.len() {
        return None;
    }

    let short_prev = short[index - 1]?;
    let long_prev = long[index - 1]?;
    let short_curr = short[index]?;
    let long_curr = long[index]?;

    if short_prev <= long_prev && short_curr > long_curr {
        Some(Crossover::Golden)
    } else if short_prev >= long_prev && short_curr < long_curr {
        Some(Crossover::Death)
    } else {
        None
    }
}
