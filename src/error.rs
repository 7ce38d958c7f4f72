use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The positioned-graph payload could not be decoded.
    #[error("invalid graph payload: {0}")]
    Payload(String),

    /// An external collaborator (rendering engine or document backend) failed.
    #[error("generation failed: {0}")]
    Generation(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn generation(err: impl std::fmt::Display) -> Self {
        Self::Generation(err.to_string())
    }
}
