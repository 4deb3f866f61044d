//! Remote market data port.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::time::Duration;

pub trait MarketDataPort {
    /// Daily bars for `symbol` in the inclusive range `[start_date, end_date]`.
    ///
    /// An empty result is legitimate. Failures are reported as
    /// `Network`, `RateLimited` or `Timeout`; implementations should give up
    /// once `timeout` has elapsed.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        timeout: Duration,
    ) -> Result<Vec<OhlcvBar>, SigtraderError>;
}
