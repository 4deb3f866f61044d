//! Incremental synchronisation of a cached series with the remote source.
//!
//! Only the missing tail is requested:
//!
//! ```text
//! fetch_start = day after last cached bar, or today - lookback_days
//! fetch_end   = today - settlement_lag_days
//! ```
//!
//! When `fetch_start > fetch_end` the cache is current and no request is
//! made. Remote failures leave the cached series untouched.

use crate::domain::error::SigtraderError;
use crate::domain::time_series::TimeSeries;
use crate::ports::data_port::MarketDataPort;
use chrono::{Days, NaiveDate};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_LOOKBACK_DAYS: u64 = 100;
pub const DEFAULT_SETTLEMENT_LAG_DAYS: u64 = 1;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub lookback_days: u64,
    pub settlement_lag_days: u64,
    pub fetch_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            settlement_lag_days: DEFAULT_SETTLEMENT_LAG_DAYS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    /// Cache already reaches `fetch_end`; no request was made.
    Current,
    /// Request made, nothing new returned.
    Unchanged,
    Updated { fetched: usize },
    /// Remote failure; the cached series is returned as-is.
    Failed { reason: String },
}

impl SyncStatus {
    pub fn is_updated(&self) -> bool {
        matches!(self, SyncStatus::Updated { .. })
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Current => write!(f, "current"),
            SyncStatus::Unchanged => write!(f, "no new bars"),
            SyncStatus::Updated { fetched } => write!(f, "{fetched} bars merged"),
            SyncStatus::Failed { reason } => write!(f, "failed ({reason}), using cached bars"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub series: TimeSeries,
    pub status: SyncStatus,
}

#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Inclusive date range still missing from `existing`, or `None` when the
    /// series is current.
    pub fn fetch_window(
        &self,
        existing: &TimeSeries,
        today: NaiveDate,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let fetch_start = match existing.latest_date() {
            Some(last) => last.succ_opt()?,
            None => today
                .checked_sub_days(Days::new(self.config.lookback_days))
                .unwrap_or(NaiveDate::MIN),
        };
        let fetch_end = today.checked_sub_days(Days::new(self.config.settlement_lag_days))?;

        (fetch_start <= fetch_end).then_some((fetch_start, fetch_end))
    }

    /// Bring `existing` up to date.
    ///
    /// Fetched bars win on date collisions, including corrections for dates
    /// already cached. Bars after `fetch_end` are dropped so unsettled bars
    /// never reach the cache. A malformed fetched bar is a `Data` error and
    /// nothing is merged.
    pub fn sync(
        &self,
        port: &dyn MarketDataPort,
        symbol: &str,
        existing: TimeSeries,
        today: NaiveDate,
    ) -> Result<SyncReport, SigtraderError> {
        let Some((start, end)) = self.fetch_window(&existing, today) else {
            debug!(symbol, "cache is current, skipping fetch");
            return Ok(SyncReport {
                series: existing,
                status: SyncStatus::Current,
            });
        };

        debug!(symbol, %start, %end, "fetching bars");
        let timeout = self.config.fetch_timeout;
        let started = Instant::now();
        let fetched = port
            .fetch_bars(symbol, start, end, timeout)
            .and_then(|bars| {
                if started.elapsed() > timeout {
                    Err(SigtraderError::Timeout {
                        symbol: symbol.to_string(),
                        timeout_ms: timeout.as_millis(),
                    })
                } else {
                    Ok(bars)
                }
            });

        let fetched = match fetched {
            Ok(bars) => bars,
            Err(e) if e.is_recoverable() => {
                warn!(symbol, error = %e, "remote fetch failed, continuing with cached bars");
                return Ok(SyncReport {
                    series: existing,
                    status: SyncStatus::Failed {
                        reason: e.to_string(),
                    },
                });
            }
            Err(e) => return Err(e),
        };

        let settled: Vec<_> = fetched.into_iter().filter(|b| b.date <= end).collect();
        for bar in &settled {
            bar.validate()?;
        }

        let fetched = settled.len();
        let series = existing.merge(settled);
        if series == existing {
            info!(symbol, %start, %end, "no new bars");
            return Ok(SyncReport {
                series: existing,
                status: SyncStatus::Unchanged,
            });
        }

        info!(symbol, fetched, total = series.len(), "merged bars");
        Ok(SyncReport {
            series,
            status: SyncStatus::Updated { fetched },
        })
    }
}
