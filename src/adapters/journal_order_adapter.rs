//! Order port that appends submitted orders to a CSV journal.
//!
//! Stands in for a broker connection: every order is recorded as
//! `submitted_at,symbol,side,size,sizing_mode`.

use crate::domain::error::SigtraderError;
use crate::domain::order::OrderRequest;
use crate::ports::order_port::OrderPort;
use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Serialize)]
struct JournalRow<'a> {
    submitted_at: String,
    symbol: &'a str,
    side: String,
    size: f64,
    sizing_mode: String,
}

pub struct JournalOrderAdapter {
    path: PathBuf,
}

impl JournalOrderAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn dispatch_error(order: &OrderRequest, reason: String) -> SigtraderError {
        SigtraderError::Dispatch {
            symbol: order.symbol.clone(),
            reason,
        }
    }
}

impl OrderPort for JournalOrderAdapter {
    fn submit(&self, order: &OrderRequest) -> Result<(), SigtraderError> {
        let is_new = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                Self::dispatch_error(order, format!("failed to open {}: {}", self.path.display(), e))
            })?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        wtr.serialize(JournalRow {
            submitted_at: Utc::now().to_rfc3339(),
            symbol: &order.symbol,
            side: order.side.to_string(),
            size: order.size,
            sizing_mode: order.sizing_mode.to_string(),
        })
        .map_err(|e| Self::dispatch_error(order, format!("journal write failed: {e}")))?;
        wtr.flush()
            .map_err(|e| Self::dispatch_error(order, format!("journal flush failed: {e}")))?;

        info!(path = %self.path.display(), %order, "order journaled");
        Ok(())
    }
}
