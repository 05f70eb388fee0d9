use thiserror::Error;

pub type RoiResult<T> = Result<T, RoiError>;

#[derive(Error, Debug)]
pub enum RoiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Schema error in {table}: missing column `{column}`")]
    Schema { table: String, column: String },

    #[error("Validation error in {table}: {reason}")]
    Validation { table: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RoiError {
    pub fn validation(table: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for RoiError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
