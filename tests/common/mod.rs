#![allow(dead_code)]

use chrono::NaiveDate;
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::OhlcvBar;
use sigtrader::domain::order::OrderRequest;
use sigtrader::domain::time_series::TimeSeries;
use sigtrader::ports::data_port::MarketDataPort;
use sigtrader::ports::order_port::OrderPort;
use sigtrader::ports::position_port::PositionPort;
use sigtrader::ports::storage_port::BarStorePort;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub enum Failure {
    Network,
    RateLimited,
    Malformed,
}

/// Remote source stub. Serves the configured bars filtered to the requested
/// window and counts every call. Revisions are returned on every fetch
/// regardless of the window, like a provider restating history.
pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub revisions: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, Failure>,
    pub delay: Option<Duration>,
    pub calls: Cell<usize>,
    pub requests: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            revisions: HashMap::new(),
            errors: HashMap::new(),
            delay: None,
            calls: Cell::new(0),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_failure(mut self, symbol: &str, failure: Failure) -> Self {
        self.errors.insert(symbol.to_string(), failure);
        self
    }

    pub fn with_revision(mut self, symbol: &str, bar: OhlcvBar) -> Self {
        self.revisions
            .entry(symbol.to_string())
            .or_default()
            .push(bar);
        self
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        _timeout: Duration,
    ) -> Result<Vec<OhlcvBar>, SigtraderError> {
        self.calls.set(self.calls.get() + 1);
        self.requests
            .borrow_mut()
            .push((symbol.to_string(), start_date, end_date));
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if let Some(failure) = self.errors.get(symbol) {
            return Err(match failure {
                Failure::Network => SigtraderError::Network {
                    symbol: symbol.to_string(),
                    reason: "connection refused".into(),
                },
                Failure::RateLimited => SigtraderError::RateLimited {
                    symbol: symbol.to_string(),
                    retry_after_secs: Some(60),
                },
                Failure::Malformed => SigtraderError::data("unexpected payload"),
            });
        }
        let mut bars: Vec<OhlcvBar> = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        bars.extend(self.revisions.get(symbol).cloned().unwrap_or_default());
        Ok(bars)
    }
}

#[derive(Default)]
pub struct MemoryBarStore {
    pub series: RefCell<HashMap<String, TimeSeries>>,
    pub persists: Cell<usize>,
}

impl MemoryBarStore {
    pub fn with_series(symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        let store = Self::default();
        store
            .series
            .borrow_mut()
            .insert(symbol.to_string(), TimeSeries::new().merge(bars));
        store
    }

    pub fn stored(&self, symbol: &str) -> TimeSeries {
        self.series
            .borrow()
            .get(symbol)
            .cloned()
            .unwrap_or_default()
    }
}

impl BarStorePort for MemoryBarStore {
    fn load(&self, symbol: &str) -> Result<TimeSeries, SigtraderError> {
        Ok(self.stored(symbol))
    }

    fn persist(&self, symbol: &str, series: &TimeSeries) -> Result<(), SigtraderError> {
        self.persists.set(self.persists.get() + 1);
        self.series
            .borrow_mut()
            .insert(symbol.to_string(), series.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FixedPositionPort {
    pub held: HashSet<String>,
}

impl FixedPositionPort {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn holding(symbol: &str) -> Self {
        Self {
            held: HashSet::from([symbol.to_string()]),
        }
    }
}

impl PositionPort for FixedPositionPort {
    fn has_open_position(&self, symbol: &str) -> Result<bool, SigtraderError> {
        Ok(self.held.contains(symbol))
    }
}

/// Records submitted orders, or rejects every one when `fail` is set.
#[derive(Default)]
pub struct RecordingOrderPort {
    pub orders: RefCell<Vec<OrderRequest>>,
    pub fail: bool,
}

impl RecordingOrderPort {
    pub fn failing() -> Self {
        Self {
            orders: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.orders.borrow().clone()
    }
}

impl OrderPort for RecordingOrderPort {
    fn submit(&self, order: &OrderRequest) -> Result<(), SigtraderError> {
        if self.fail {
            return Err(SigtraderError::Dispatch {
                symbol: order.symbol.clone(),
                reason: "broker rejected order".into(),
            });
        }
        self.orders.borrow_mut().push(order.clone());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, open: f64, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting at `start`, with the given closes.
/// Each bar opens at its own close.
pub fn bars_from_closes(start: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn generate_bars(start: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(start, &closes)
}
