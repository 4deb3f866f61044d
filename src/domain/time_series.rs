//! Ordered, deduplicated bar sequence for a single symbol.
//!
//! A `TimeSeries` is strictly increasing by date. The only way to grow one is
//! [`TimeSeries::merge`], which re-establishes ordering and uniqueness from
//! scratch rather than trusting the incoming bars.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    bars: Vec<OhlcvBar>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Build from bars that are expected to already be strictly increasing.
    ///
    /// Used when reading persisted data: an out-of-order or duplicate date
    /// means the file is corrupt, so nothing is re-sorted here.
    pub fn try_from_bars(bars: Vec<OhlcvBar>) -> Result<Self, SigtraderError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SigtraderError::data(format!(
                    "dates not strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        for bar in &bars {
            bar.validate()?;
        }
        Ok(Self { bars })
    }

    /// Union of `self` and `fetched` keyed by date, sorted ascending.
    /// Fetched bars replace existing bars on the same date.
    pub fn merge(&self, fetched: Vec<OhlcvBar>) -> TimeSeries {
        let mut by_date: BTreeMap<NaiveDate, OhlcvBar> =
            self.bars.iter().map(|b| (b.date, b.clone())).collect();
        for bar in fetched {
            by_date.insert(bar.date, bar);
        }
        TimeSeries {
            bars: by_date.into_values().collect(),
        }
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
