//! CSV-backed Bar Store.
//!
//! Layout: `{base_path}/{SYMBOL}.csv`
//!
//! - Atomic writes (write `.csv.tmp`, fsync, rename into place)
//! - Per-symbol lock file (`{SYMBOL}.lock`) held for the duration of a persist
//! - Strict load: unparsable rows or out-of-order dates are a storage error

use crate::adapters::csv_bars::{read_bars, write_bars};
use crate::domain::error::SigtraderError;
use crate::domain::time_series::TimeSeries;
use crate::ports::storage_port::BarStorePort;
use chrono::NaiveDate;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvBarStore {
    base_path: PathBuf,
}

/// Removes the lock file when dropped, including on early return.
struct PersistLock {
    path: PathBuf,
}

impl Drop for PersistLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl CsvBarStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    fn tmp_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv.tmp"))
    }

    fn lock_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.lock"))
    }

    fn acquire_lock(&self, symbol: &str) -> Result<PersistLock, SigtraderError> {
        let path = self.lock_path(symbol);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(PersistLock { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(SigtraderError::storage(
                symbol,
                format!("another persist holds {}", path.display()),
            )),
            Err(e) => Err(SigtraderError::storage(
                symbol,
                format!("failed to create lock {}: {}", path.display(), e),
            )),
        }
    }

    fn write_tmp(&self, symbol: &str, series: &TimeSeries, tmp: &Path) -> Result<(), SigtraderError> {
        let file = File::create(tmp).map_err(|e| {
            SigtraderError::storage(symbol, format!("failed to create {}: {}", tmp.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        write_bars(&mut writer, series.bars())
            .map_err(|e| SigtraderError::storage(symbol, format!("write failed: {e}")))?;
        let file = writer
            .into_inner()
            .map_err(|e| SigtraderError::storage(symbol, format!("flush failed: {e}")))?;
        file.sync_all()
            .map_err(|e| SigtraderError::storage(symbol, format!("fsync failed: {e}")))?;
        Ok(())
    }

    /// Path of the lock file for `symbol` if one exists. Outside a persist in
    /// progress this is a lock left behind by a crashed run, and it blocks
    /// every persist until removed.
    pub fn held_lock(&self, symbol: &str) -> Option<PathBuf> {
        let path = self.lock_path(symbol);
        path.exists().then_some(path)
    }

    /// First date, last date and bar count of the cached series.
    pub fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SigtraderError> {
        let series = self.load(symbol)?;
        Ok(match (series.first_date(), series.latest_date()) {
            (Some(first), Some(last)) => Some((first, last, series.len())),
            _ => None,
        })
    }
}

impl BarStorePort for CsvBarStore {
    fn load(&self, symbol: &str) -> Result<TimeSeries, SigtraderError> {
        let path = self.csv_path(symbol);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TimeSeries::new()),
            Err(e) => {
                return Err(SigtraderError::storage(
                    symbol,
                    format!("failed to read {}: {}", path.display(), e),
                ));
            }
        };

        let bars = read_bars(file)
            .map_err(|reason| SigtraderError::storage(symbol, format!("{}: {}", path.display(), reason)))?;
        TimeSeries::try_from_bars(bars)
            .map_err(|e| SigtraderError::storage(symbol, format!("{}: {}", path.display(), e)))
    }

    fn persist(&self, symbol: &str, series: &TimeSeries) -> Result<(), SigtraderError> {
        // Shared by all symbols: failures here are `Io`, not `Storage`.
        fs::create_dir_all(&self.base_path)?;

        let _lock = self.acquire_lock(symbol)?;
        let path = self.csv_path(symbol);
        let tmp = self.tmp_path(symbol);

        if let Err(e) = self.write_tmp(symbol, series, &tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            SigtraderError::storage(symbol, format!("atomic rename failed: {e}"))
        })?;

        debug!(symbol, bars = series.len(), path = %path.display(), "persisted series");
        Ok(())
    }
}
