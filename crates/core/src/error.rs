use thiserror::Error;

/// Errors raised by the tabular side of the pipeline
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Could not parse uploaded CSV: {0}")]
    InvalidCsv(String),

    #[error("Could not serialize CSV: {0}")]
    Serialize(String),
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::InvalidCsv(err.to_string())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
