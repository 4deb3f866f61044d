//! Position oracle port.

use crate::domain::error::SigtraderError;

pub trait PositionPort {
    /// Queried fresh every cycle.
    fn has_open_position(&self, symbol: &str) -> Result<bool, SigtraderError>;
}
