use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corpus contains no usable examples")]
    Empty,
}
