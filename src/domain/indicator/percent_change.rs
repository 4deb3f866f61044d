//! Intraday percent change of the most recent bar.
//!
//! PCT = (C[last] - O[last]) / O[last], as a fraction (-0.03 is a 3% drop).

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;

/// `Ok(None)` on an empty series. A zero open is a data error, never a
/// silent zero.
pub fn percent_change(bars: &[OhlcvBar]) -> Result<Option<f64>, SigtraderError> {
    let Some(latest) = bars.last() else {
        return Ok(None);
    };

    if latest.open == 0.0 {
        return Err(SigtraderError::data(format!(
            "open price is zero on {}",
            latest.date
        )));
    }

    let change = (latest.close - latest.open) / latest.open;
    if !change.is_finite() {
        return Err(SigtraderError::data(format!(
            "percent change on {} is not finite",
            latest.date
        )));
    }
    Ok(Some(change))
}
