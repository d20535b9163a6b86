use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApotekError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

pub type Result<T> = std::result::Result<T, ApotekError>;
