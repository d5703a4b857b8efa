//! Domain error types.

/// Top-level error type for balancewheel.
#[derive(Debug, thiserror::Error)]
pub enum BalanceWheelError {
    #[error("http request to {provider} failed: {reason}")]
    Http { provider: String, reason: String },

    #[error("{provider} returned {status}: {reason}")]
    Api {
        provider: String,
        status: u16,
        reason: String,
    },

    #[error("rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    #[error("unexpected {provider} payload: {reason}")]
    Parse { provider: String, reason: String },

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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("bars for {symbol} are not in chronological order at {date}")]
    Unordered { symbol: String, date: String },

    #[error("invalid position {symbol}: {reason}")]
    InvalidPosition { symbol: String, reason: String },

    #[error("model error: {reason}")]
    Model { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BalanceWheelError {
    pub fn http(provider: &str, err: impl std::fmt::Display) -> Self {
        BalanceWheelError::Http {
            provider: provider.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn parse(provider: &str, reason: impl Into<String>) -> Self {
        BalanceWheelError::Parse {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    pub fn model(reason: impl Into<String>) -> Self {
        BalanceWheelError::Model {
            reason: reason.into(),
        }
    }

    /// True for failures that originate upstream of this process.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            BalanceWheelError::Http { .. }
                | BalanceWheelError::Api { .. }
                | BalanceWheelError::RateLimited { .. }
                | BalanceWheelError::Parse { .. }
        )
    }
}

impl From<&BalanceWheelError> for std::process::ExitCode {
    fn from(err: &BalanceWheelError) -> Self {
        let code: u8 = match err {
            BalanceWheelError::Io(_) => 1,
            BalanceWheelError::ConfigParse { .. }
            | BalanceWheelError::ConfigMissing { .. }
            | BalanceWheelError::ConfigInvalid { .. }
            | BalanceWheelError::InvalidPosition { .. } => 2,
            BalanceWheelError::Http { .. }
            | BalanceWheelError::Api { .. }
            | BalanceWheelError::RateLimited { .. }
            | BalanceWheelError::Parse { .. } => 3,
            BalanceWheelError::NoData { .. }
            | BalanceWheelError::InsufficientData { .. }
            | BalanceWheelError::Unordered { .. } => 5,
            BalanceWheelError::Model { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
