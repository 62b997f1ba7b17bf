use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TEI error: {0}")]
    Tei(String),

    #[error("Qdrant error: {0}")]
    Qdrant(String),

    #[error("vector store error: {0}")]
    Store(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("model file {file} for {repo} is not available (offline cache miss or download failure)")]
    ModelUnavailable { repo: String, file: String },

    #[error("unknown sentiment label: {0}")]
    UnknownLabel(String),

    #[error("embedding has {actual} dimensions, collection expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("input text is empty")]
    EmptyInput,
}
