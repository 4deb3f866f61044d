//! Strategy configuration and the signal engine.
//!
//! A run selects one [`Strategy`] variant up front; each variant recomputes
//! everything it needs from the bar slice and the supplied position on every
//! call, so evaluation is a pure function of its inputs.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{calculate_sma, detect_crossover, percent_change, Crossover};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::PositionState;
use crate::domain::signal::{Action, Evaluation, Signal, SignalReason};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingMode {
    /// Integer share quantity.
    Shares,
    /// Currency amount.
    Notional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Threshold,
    Crossover,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    pub short_window: usize,
    pub long_window: usize,
    pub position_size: f64,
    pub sizing_mode: SizingMode,
}

impl Default for StrategyConfig {
    /// 3% dip / 5% rise, 20/50 SMA, 10 shares.
    fn default() -> Self {
        Self {
            buy_threshold: -0.03,
            sell_threshold: 0.05,
            short_window: 20,
            long_window: 50,
            position_size: 10.0,
            sizing_mode: SizingMode::Shares,
        }
    }
}

impl StrategyConfig {
    fn emit(
        &self,
        symbol: &str,
        bar: &OhlcvBar,
        action: Action,
        reason: SignalReason,
    ) -> Signal {
        let size = match action {
            Action::Hold => 0.0,
            Action::Buy | Action::Sell => self.position_size,
        };
        Signal {
            symbol: symbol.to_string(),
            date: bar.date,
            action,
            size,
            sizing_mode: self.sizing_mode,
            reason,
        }
    }
}

/// Buy the dip, sell the rip, on the latest bar's intraday move.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdStrategy {
    pub config: StrategyConfig,
}

impl ThresholdStrategy {
    pub fn evaluate(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        position: &PositionState,
    ) -> Result<Evaluation, SigtraderError> {
        let (Some(latest), Some(change)) = (bars.last(), percent_change(bars)?) else {
            return Ok(Evaluation::Insufficient {
                bars: bars.len(),
                required: 1,
            });
        };

        // Buy is checked first; the two branches need opposite position
        // states so they cannot both fire.
        let (action, reason) = if change < self.config.buy_threshold && !position.has_position {
            (Action::Buy, SignalReason::ThresholdDip)
        } else if change > self.config.sell_threshold && position.has_position {
            (Action::Sell, SignalReason::ThresholdRise)
        } else {
            (Action::Hold, SignalReason::NoTrigger)
        };

        Ok(Evaluation::Signal(
            self.config.emit(symbol, latest, action, reason),
        ))
    }
}

/// Short/long SMA crossover, evaluated at the latest bar only.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverStrategy {
    pub config: StrategyConfig,
}

impl CrossoverStrategy {
    /// Two bars at minimum: a cross compares the latest bar with the one
    /// before it.
    pub fn required_bars(&self) -> usize {
        (self.config.long_window + 1).max(2)
    }

    pub fn evaluate(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        position: &PositionState,
    ) -> Result<Evaluation, SigtraderError> {
        let required = self.required_bars();
        let insufficient = Evaluation::Insufficient {
            bars: bars.len(),
            required,
        };
        let Some(latest) = bars.last() else {
            return Ok(insufficient);
        };
        if bars.len() < required {
            return Ok(insufficient);
        }

        let short = calculate_sma(bars, self.config.short_window);
        let long = calculate_sma(bars, self.config.long_window);
        let last = bars.len() - 1;

        let defined = [short[last - 1], short[last], long[last - 1], long[last]]
            .iter()
            .all(Option::is_some);
        if !defined {
            return Ok(insufficient);
        }

        let (action, reason) = match detect_crossover(&short, &long, last) {
            Some(Crossover::Golden) if !position.has_position => {
                (Action::Buy, SignalReason::GoldenCross)
            }
            Some(Crossover::Death) if position.has_position => {
                (Action::Sell, SignalReason::DeathCross)
            }
            _ => (Action::Hold, SignalReason::NoTrigger),
        };

        Ok(Evaluation::Signal(
            self.config.emit(symbol, latest, action, reason),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Threshold(ThresholdStrategy),
    Crossover(CrossoverStrategy),
}

impl Strategy {
    pub fn new(kind: StrategyKind, config: StrategyConfig) -> Self {
        match kind {
            StrategyKind::Threshold => Strategy::Threshold(ThresholdStrategy { config }),
            StrategyKind::Crossover => Strategy::Crossover(CrossoverStrategy { config }),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Threshold(_) => StrategyKind::Threshold,
            Strategy::Crossover(_) => StrategyKind::Crossover,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        match self {
            Strategy::Threshold(s) => &s.config,
            Strategy::Crossover(s) => &s.config,
        }
    }

    pub fn evaluate(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        position: &PositionState,
    ) -> Result<Evaluation, SigtraderError> {
        match self {
            Strategy::Threshold(s) => s.evaluate(symbol, bars, position),
            Strategy::Crossover(s) => s.evaluate(symbol, bars, position),
        }
    }
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingMode::Shares => write!(f, "shares"),
            SizingMode::Notional => write!(f, "notional"),
        }
    }
}

impl FromStr for SizingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shares" => Ok(SizingMode::Shares),
            "notional" => Ok(SizingMode::Notional),
            other => Err(format!("unknown sizing mode '{other}' (expected shares or notional)")),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Threshold => write!(f, "threshold"),
            StrategyKind::Crossover => write!(f, "crossover"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "threshold" => Ok(StrategyKind::Threshold),
            "crossover" => Ok(StrategyKind::Crossover),
            other => Err(format!(
                "unknown strategy kind '{other}' (expected threshold or crossover)"
            )),
        }
    }
}
