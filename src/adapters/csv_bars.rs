//! CSV encoding of daily bars shared by the feed and the bar store.
//!
//! Layout: `date,open,high,low,close,volume` with ISO dates.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use csv::StringRecord;
use std::io::{Read, Write};
use std::str::FromStr;

pub const HEADER: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

fn field<T: FromStr>(record: &StringRecord, index: usize, name: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(index)
        .ok_or_else(|| format!("missing {name} column"))?;
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid {name} value '{raw}': {e}"))
}

fn parse_record(record: &StringRecord) -> Result<OhlcvBar, String> {
    let date_str = record.get(0).ok_or("missing date column")?;
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date format '{date_str}': {e}"))?;

    Ok(OhlcvBar {
        date,
        open: field(record, 1, "open")?,
        high: field(record, 2, "high")?,
        low: field(record, 3, "low")?,
        close: field(record, 4, "close")?,
        volume: field(record, 5, "volume")?,
    })
}

/// Parse every row in file order. Errors carry the 1-based data line.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<OhlcvBar>, String> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| format!("CSV parse error: {e}"))?;
        let bar = parse_record(&record).map_err(|e| format!("row {}: {e}", i + 1))?;
        bars.push(bar);
    }
    Ok(bars)
}

pub fn write_bars<W: Write>(writer: W, bars: &[OhlcvBar]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for bar in bars {
        wtr.write_record([
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
