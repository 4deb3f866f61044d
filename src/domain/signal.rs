//! Trade signals emitted by a strategy evaluation.

use crate::domain::order::{OrderRequest, OrderSide};
use crate::domain::strategy::SizingMode;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// Which rule produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalReason {
    ThresholdDip,
    ThresholdRise,
    GoldenCross,
    DeathCross,
    NoTrigger,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    /// Date of the bar the decision was derived from.
    pub date: NaiveDate,
    pub action: Action,
    pub size: f64,
    pub sizing_mode: SizingMode,
    pub reason: SignalReason,
}

impl Signal {
    /// The order this signal asks for, if any. Hold never produces one.
    pub fn order_request(&self) -> Option<OrderRequest> {
        let side = match self.action {
            Action::Buy => OrderSide::Buy,
            Action::Sell => OrderSide::Sell,
            Action::Hold => return None,
        };
        Some(OrderRequest {
            symbol: self.symbol.clone(),
            side,
            size: self.size,
            sizing_mode: self.sizing_mode,
        })
    }
}

/// Outcome of running a strategy over a series.
///
/// `Insufficient` is the expected steady state before enough history
/// exists; it is not an error and never produces an order.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Signal(Signal),
    Insufficient { bars: usize, required: usize },
}

impl Evaluation {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Evaluation::Signal(s) => Some(s),
            Evaluation::Insufficient { .. } => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

impl fmt::Display for SignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalReason::ThresholdDip => write!(f, "threshold_dip"),
            SignalReason::ThresholdRise => write!(f, "threshold_rise"),
            SignalReason::GoldenCross => write!(f, "golden_cross"),
            SignalReason::DeathCross => write!(f, "death_cross"),
            SignalReason::NoTrigger => write!(f, "no_trigger"),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Hold => write!(f, "HOLD {} on {} ({})", self.symbol, self.date, self.reason),
            _ => write!(
                f,
                "{} {} {} {} on {} ({})",
                self.action, self.size, self.sizing_mode, self.symbol, self.date, self.reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(action: Action) -> Signal {
        Signal {
            symbol: "NVDA".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            action,
            size: 10.0,
            sizing_mode: SizingMode::Shares,
            reason: SignalReason::ThresholdDip,
        }
    }

    #[test]
    fn buy_maps_to_buy_order() {
        let order = signal(Action::Buy).order_request().unwrap();
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.symbol, "NVDA");
        assert_eq!(order.size, 10.0);
        assert_eq!(order.sizing_mode, SizingMode::Shares);
    }

    #[test]
    fn sell_maps_to_sell_order() {
        let order = signal(Action::Sell).order_request().unwrap();
        assert_eq!(order.side, OrderSide::Sell);
    }

    #[test]
    fn hold_has_no_order() {
        assert!(signal(Action::Hold).order_request().is_none());
    }

    #[test]
    fn insufficient_has_no_signal() {
        let eval = Evaluation::Insufficient {
            bars: 0,
            required: 1,
        };
        assert!(eval.signal().is_none());
    }

    #[test]
    fn display_buy() {
        assert_eq!(
            signal(Action::Buy).to_string(),
            "BUY 10 shares NVDA on 2024-06-03 (threshold_dip)"
        );
    }

    #[test]
    fn display_hold() {
        let mut s = signal(Action::Hold);
        s.reason = SignalReason::NoTrigger;
        assert_eq!(s.to_string(), "HOLD NVDA on 2024-06-03 (no_trigger)");
    }
}
