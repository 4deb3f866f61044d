//! Bar Store persistence port.

use crate::domain::error::SigtraderError;
use crate::domain::time_series::TimeSeries;

/// Key-value store of one serialized `TimeSeries` per symbol.
pub trait BarStorePort {
    /// Empty series if nothing has been persisted. Corrupt data is a
    /// `Storage` error, never repaired silently.
    fn load(&self, symbol: &str) -> Result<TimeSeries, SigtraderError>;

    /// Replace the stored series atomically: readers see either the old or
    /// the new series, never a partial write.
    fn persist(&self, symbol: &str, series: &TimeSeries) -> Result<(), SigtraderError>;
}
