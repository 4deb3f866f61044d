//! Configuration validation.
//!
//! Validates all config fields before any evaluation runs. Numeric keys are
//! read as strings so that a typo is reported instead of silently replaced
//! by the default.

use crate::domain::error::SigtraderError;
use crate::domain::strategy::{SizingMode, StrategyKind};
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_cache_dir(config)?;
    validate_lookback(config)?;
    validate_settlement_lag(config)?;
    validate_fetch_timeout(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_kind(config)?;
    validate_thresholds(config)?;
    validate_windows(config)?;
    validate_sizing(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SigtraderError {
    SigtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn optional_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => {
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(section, key, format!("'{raw}' is not a number")))?;
            if !value.is_finite() {
                return Err(invalid(section, key, "must be finite"));
            }
            Ok(Some(value))
        }
    }
}

fn optional_i64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("'{raw}' is not an integer"))),
    }
}

fn validate_cache_dir(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("data", "cache_dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("data", "cache_dir", "cache_dir must not be empty")),
        None => Err(SigtraderError::ConfigMissing {
            section: "data".to_string(),
            key: "cache_dir".to_string(),
        }),
    }
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(days) = optional_i64(config, "data", "lookback_days")? {
        if days < 1 {
            return Err(invalid("data", "lookback_days", "lookback_days must be at least 1"));
        }
    }
    Ok(())
}

fn validate_settlement_lag(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(days) = optional_i64(config, "data", "settlement_lag_days")? {
        if days < 0 {
            return Err(invalid(
                "data",
                "settlement_lag_days",
                "settlement_lag_days must be non-negative",
            ));
        }
    }
    Ok(())
}

fn validate_fetch_timeout(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(secs) = optional_i64(config, "data", "fetch_timeout_secs")? {
        if secs < 1 {
            return Err(invalid(
                "data",
                "fetch_timeout_secs",
                "fetch_timeout_secs must be at least 1",
            ));
        }
    }
    Ok(())
}

fn validate_kind(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(kind) = config.get_string("strategy", "kind") {
        kind.parse::<StrategyKind>()
            .map_err(|reason| invalid("strategy", "kind", reason))?;
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(buy) = optional_f64(config, "strategy", "buy_threshold")? {
        if buy >= 0.0 {
            return Err(invalid(
                "strategy",
                "buy_threshold",
                "buy_threshold must be negative",
            ));
        }
    }
    if let Some(sell) = optional_f64(config, "strategy", "sell_threshold")? {
        if sell <= 0.0 {
            return Err(invalid(
                "strategy",
                "sell_threshold",
                "sell_threshold must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let short = optional_i64(config, "strategy", "short_window")?;
    let long = optional_i64(config, "strategy", "long_window")?;

    if let Some(short) = short {
        if short < 1 {
            return Err(invalid(
                "strategy",
                "short_window",
                "short_window must be at least 1",
            ));
        }
    }
    if let Some(long) = long {
        if long < 1 {
            return Err(invalid(
                "strategy",
                "long_window",
                "long_window must be at least 1",
            ));
        }
    }

    let defaults = crate::domain::strategy::StrategyConfig::default();
    let short = short.unwrap_or(defaults.short_window as i64);
    let long = long.unwrap_or(defaults.long_window as i64);
    if long <= short {
        return Err(invalid(
            "strategy",
            "long_window",
            format!("long_window ({long}) must exceed short_window ({short})"),
        ));
    }
    Ok(())
}

fn validate_sizing(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let mode = match config.get_string("strategy", "sizing_mode") {
        Some(raw) => raw
            .parse::<SizingMode>()
            .map_err(|reason| invalid("strategy", "sizing_mode", reason))?,
        None => SizingMode::Shares,
    };

    if let Some(size) = optional_f64(config, "strategy", "position_size")? {
        if size <= 0.0 {
            return Err(invalid(
                "strategy",
                "position_size",
                "position_size must be positive",
            ));
        }
        if mode == SizingMode::Shares && size.fract() != 0.0 {
            return Err(invalid(
                "strategy",
                "position_size",
                "position_size must be a whole number of shares",
            ));
        }
    }
    Ok(())
}
