//! Domain error types.
//!
//! A backtest either completes with full logs or aborts with one of these;
//! no partial logs are ever exposed.

/// Top-level error type for trendband.
#[derive(Debug, thiserror::Error)]
pub enum TrendbandError {
    /// Bad or missing market data. Raised before the simulation loop starts.
    #[error("data error for {symbol}: {reason}")]
    Data { symbol: String, reason: String },

    /// A broken position invariant (buy while long, sell while flat).
    /// Indicates a defect in the rule engine, never swallowed.
    #[error("invalid trade state on {date}: {reason}")]
    State {
        date: chrono::NaiveDate,
        reason: String,
    },

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

impl TrendbandError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            TrendbandError::Io(_) => 1,
            TrendbandError::ConfigParse { .. }
            | TrendbandError::ConfigMissing { .. }
            | TrendbandError::ConfigInvalid { .. } => 2,
            TrendbandError::Data { .. } => 3,
            TrendbandError::State { .. } => 4,
        }
    }
}

impl From<&TrendbandError> for std::process::ExitCode {
    fn from(err: &TrendbandError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
