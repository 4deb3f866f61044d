//! INI configuration adapter.
//!
//! Sections and keys are case-insensitive. Values are returned verbatim apart
//! from surrounding whitespace; typed getters fall back to the caller's
//! default on a missing or unparsable value, so strict checking belongs in
//! config validation.

use crate::domain::error::SigtraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SigtraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| SigtraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, SigtraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| SigtraderError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key).map(|v| v.trim().to_string())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
cache_dir = /var/lib/sigtrader
lookback_days = 100

[strategy]
kind = threshold
buy_threshold = -0.03
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "cache_dir"),
            Some("/var/lib/sigtrader".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "kind"),
            Some("threshold".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\ncache_dir = c\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[data]\nlookback_days = 45\n").unwrap();
        assert_eq!(adapter.get_int("data", "lookback_days", 0), 45);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        assert_eq!(adapter.get_int("data", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[data]\nlookback_days = abc\n").unwrap();
        assert_eq!(adapter.get_int("data", "lookback_days", 42), 42);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nsell_threshold = 0.05\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "sell_threshold", 0.0), 0.05);
    }

    #[test]
    fn get_double_parses_negative() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nbuy_threshold = -0.03\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "buy_threshold", 0.0), -0.03);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nposition_size = lots\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "position_size", 99.9), 99.9);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[orders]\njournal_path = /tmp/orders.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("orders", "journal_path"),
            Some("/tmp/orders.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(
            result,
            Err(SigtraderError::ConfigParse { ref file, .. }) if file.contains("config.ini")
        ));
    }

    #[test]
    fn get_list_splits_and_trims() {
        let adapter =
            FileConfigAdapter::from_string("[positions]\nheld = nvda, AAPL ,,msft\n").unwrap();
        assert_eq!(
            adapter.get_list("positions", "held"),
            vec!["nvda", "AAPL", "msft"]
        );
        assert!(adapter.get_list("positions", "missing").is_empty());
    }

    #[test]
    fn sections_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Data]\nCache_Dir = c\n").unwrap();
        assert_eq!(adapter.get_string("data", "cache_dir"), Some("c".to_string()));
    }
}
