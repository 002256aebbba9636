use thiserror::Error;

/// Invalid input handed to the market core
///
/// These are caller bugs, never transient conditions: nothing in the core
/// performs I/O, so a failed call will fail the same way on retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarketError {
    #[error("probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("maximum valuation must be positive and finite, got {0}")]
    InvalidMaxValue(f64),

    #[error("valuations must be finite and non-negative, got {0}")]
    InvalidValuation(f64),

    #[error("market has {sellers} sellers but {buyers} buyers")]
    LengthMismatch { sellers: usize, buyers: usize },
}

/// Failures of the experiment driver around the core
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
