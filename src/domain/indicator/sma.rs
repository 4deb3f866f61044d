//! SMA (Simple Moving Average) indicator.
//!
//! SMA(n)[i] = (C[i] + C[i-1] + ... + C[i-n+1]) / n
//! Warmup: first (n-1) bars are `None`. Trailing window only.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; bars.len()];
    }

    let mut values = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        if i + 1 < period {
            values.push(None);
            continue;
        }
        let window = &bars[i + 1 - period..=i];
        let sum: f64 = window.iter().map(|b| b.close).sum();
        values.push(Some(sum / period as f64));
    }
    values
}
