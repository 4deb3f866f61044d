//! CSV feed data source.
//!
//! Reads provider dumps from `{base_path}/{SYMBOL}.csv` and serves them
//! through [`MarketDataPort`]. A symbol without a dump simply has no bars;
//! an unreadable feed directory is treated as the remote being unreachable.

use crate::adapters::csv_bars::read_bars;
use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub struct CsvFeedAdapter {
    base_path: PathBuf,
}

impl CsvFeedAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl MarketDataPort for CsvFeedAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        _timeout: Duration,
    ) -> Result<Vec<OhlcvBar>, SigtraderError> {
        if !self.base_path.is_dir() {
            return Err(SigtraderError::Network {
                symbol: symbol.to_string(),
                reason: format!("feed directory {} unavailable", self.base_path.display()),
            });
        }

        let path = self.csv_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(symbol, path = %path.display(), "no feed file");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(SigtraderError::Network {
                    symbol: symbol.to_string(),
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut bars: Vec<OhlcvBar> = read_bars(content.as_bytes())
            .map_err(|reason| SigtraderError::data(format!("{}: {}", path.display(), reason)))?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
