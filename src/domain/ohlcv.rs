//! Daily OHLCV bar representation.

use crate::domain::error::SigtraderError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Prices must be positive and finite, volume non-negative.
    pub fn validate(&self) -> Result<(), SigtraderError> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(SigtraderError::data(format!(
                    "bar {} has invalid {field} {value}",
                    self.date
                )));
            }
        }
        if self.volume < 0 {
            return Err(SigtraderError::data(format!(
                "bar {} has negative volume {}",
                self.date, self.volume
            )));
        }
        Ok(())
    }
}
