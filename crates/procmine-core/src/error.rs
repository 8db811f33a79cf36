use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcMineError {
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    #[error("unknown reference: {0}")]
    UnknownReference(String),

    #[error("malformed timestamp on {id}: {reason}")]
    MalformedTimestamp { id: String, reason: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ProcMineError>;
