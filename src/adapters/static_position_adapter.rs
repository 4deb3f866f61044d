//! Position oracle backed by a fixed list of held symbols.

use crate::domain::error::SigtraderError;
use crate::ports::config_port::ConfigPort;
use crate::ports::position_port::PositionPort;
use std::collections::HashSet;

pub struct StaticPositionAdapter {
    held: HashSet<String>,
}

impl StaticPositionAdapter {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let held = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { held }
    }

    /// Reads `[positions] held = NVDA,AAPL`. A missing key means flat
    /// everywhere.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self::new(config.get_list("positions", "held"))
    }
}

impl PositionPort for StaticPositionAdapter {
    fn has_open_position(&self, symbol: &str) -> Result<bool, SigtraderError> {
        Ok(self.held.contains(&symbol.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn held_symbols_are_case_insensitive() {
        let adapter = StaticPositionAdapter::new(["nvda", " AAPL "]);
        assert!(adapter.has_open_position("NVDA").unwrap());
        assert!(adapter.has_open_position("aapl").unwrap());
        assert!(!adapter.has_open_position("MSFT").unwrap());
    }

    #[test]
    fn from_config_parses_list() {
        let config =
            FileConfigAdapter::from_string("[positions]\nheld = NVDA, AAPL,,\n").unwrap();
        let adapter = StaticPositionAdapter::from_config(&config);
        assert!(adapter.has_open_position("NVDA").unwrap());
        assert!(adapter.has_open_position("AAPL").unwrap());
        assert!(!adapter.has_open_position("").unwrap());
    }

    #[test]
    fn missing_section_is_flat() {
        let config = FileConfigAdapter::from_string("[data]\ncache_dir = c\n").unwrap();
        let adapter = StaticPositionAdapter::from_config(&config);
        assert!(!adapter.has_open_position("NVDA").unwrap());
    }
}
