//! Domain error types.

/// Top-level error type for a backtest run.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
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

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient history for {ticker}: have {bars} bars, need {required}")]
    InsufficientHistory {
        ticker: String,
        bars: usize,
        required: usize,
    },

    #[error("{metric} is undefined: {reason}")]
    DegenerateMetric { metric: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktestError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BacktestError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(section: &str, key: &str) -> Self {
        BacktestError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    /// True for the configuration family of errors.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BacktestError::ConfigParse { .. }
                | BacktestError::ConfigMissing { .. }
                | BacktestError::ConfigInvalid { .. }
        )
    }
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::DataSource { .. } | BacktestError::InvalidSeries { .. } => 3,
            BacktestError::NoData { .. } | BacktestError::InsufficientHistory { .. } => 5,
            BacktestError::DegenerateMetric { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_no_data() {
        let err = BacktestError::NoData {
            ticker: "AAPL".into(),
        };
        assert_eq!(err.to_string(), "no data for AAPL");
    }

    #[test]
    fn display_insufficient_history() {
        let err = BacktestError::InsufficientHistory {
            ticker: "TCS.NS".into(),
            bars: 10,
            required: 50,
        };
        assert_eq!(
            err.to_string(),
            "insufficient history for TCS.NS: have 10 bars, need 50"
        );
    }

    #[test]
    fn display_degenerate_metric() {
        let err = BacktestError::DegenerateMetric {
            metric: "sharpe ratio".into(),
            reason: "volatility is zero".into(),
        };
        assert_eq!(err.to_string(), "sharpe ratio is undefined: volatility is zero");
    }

    #[test]
    fn helpers_build_config_errors() {
        let err = BacktestError::invalid("backtest", "fast_period", "must be at least 1");
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "invalid config value [backtest] fast_period: must be at least 1"
        );

        let err = BacktestError::missing("backtest", "ticker");
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "missing config key [backtest] ticker");
    }

    #[test]
    fn data_errors_are_not_configuration() {
        let err = BacktestError::NoData {
            ticker: "X".into(),
        };
        assert!(!err.is_configuration());
    }
}
