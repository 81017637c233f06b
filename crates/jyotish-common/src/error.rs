use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A chart provider endpoint answered with a non-success status.
    #[error("API error [{endpoint}]: {status} - {body}")]
    Provider {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("http error: {0}")]
    Http(String),

    #[error("{0}")]
    Chat(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
