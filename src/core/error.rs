use thiserror::Error;

#[derive(Error, Debug)]
pub enum NluError {
    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("Invalid intent catalog: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NluError>;
