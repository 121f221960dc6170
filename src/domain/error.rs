//! Domain error types.

/// Top-level error type for diptrader.
#[derive(Debug, thiserror::Error)]
pub enum DiptraderError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient history: have {days} days of data, need {minimum}")]
    InsufficientHistory { days: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DiptraderError> for std::process::ExitCode {
    fn from(err: &DiptraderError) -> Self {
        let code: u8 = match err {
            DiptraderError::Io(_) => 1,
            DiptraderError::ConfigParse { .. }
            | DiptraderError::ConfigMissing { .. }
            | DiptraderError::ConfigInvalid { .. } => 2,
            DiptraderError::Data { .. } => 3,
            DiptraderError::NoData { .. } | DiptraderError::InsufficientHistory { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
