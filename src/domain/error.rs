//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("network error fetching {symbol}: {reason}")]
    Network { symbol: String, reason: String },

    #[error("rate limited fetching {symbol}")]
    RateLimited {
        symbol: String,
        retry_after_secs: Option<u64>,
    },

    #[error("fetch for {symbol} exceeded {timeout_ms}ms")]
    Timeout { symbol: String, timeout_ms: u128 },

    #[error("storage error for {symbol}: {reason}")]
    Storage { symbol: String, reason: String },

    #[error("order dispatch failed for {symbol}: {reason}")]
    Dispatch { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub fn data(reason: impl Into<String>) -> Self {
        SigtraderError::Data {
            reason: reason.into(),
        }
    }

    pub fn storage(symbol: &str, reason: impl Into<String>) -> Self {
        SigtraderError::Storage {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    /// Remote fetch failures: the cycle falls back to cached bars.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SigtraderError::Network { .. }
                | SigtraderError::RateLimited { .. }
                | SigtraderError::Timeout { .. }
        )
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Storage { .. } => 3,
            SigtraderError::Data { .. } => 4,
            SigtraderError::Network { .. }
            | SigtraderError::RateLimited { .. }
            | SigtraderError::Timeout { .. } => 5,
            SigtraderError::Dispatch { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
