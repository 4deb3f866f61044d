//! Externally supplied position state.

/// Whether the account currently holds `symbol`. Read once per cycle from the
/// position port; the core never changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    pub symbol: String,
    pub has_position: bool,
}

impl PositionState {
    pub fn flat(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            has_position: false,
        }
    }

    pub fn holding(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            has_position: true,
        }
    }
}
