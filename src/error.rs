/// Library error types
#[derive(Debug, thiserror::Error)]
pub enum WarmRestartError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Optimizer must have a learning rate (\"lr\") field")]
    MissingLearningRateAttribute,

    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WarmRestartError>;
