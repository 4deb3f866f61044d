//! Order requests handed to the order port.

use crate::domain::strategy::SizingMode;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// A market order. `size` is a share count or a currency amount depending on
/// `sizing_mode`; converting between the two is the broker's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub size: f64,
    pub sizing_mode: SizingMode,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sizing_mode {
            SizingMode::Shares => write!(f, "{} {} shares of {}", self.side, self.size, self.symbol),
            SizingMode::Notional => write!(f, "{} ${:.2} of {}", self.side, self.size, self.symbol),
        }
    }
}
