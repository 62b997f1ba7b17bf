use senti_engine::SentimentError;
use thiserror::Error;

/// Failures surfaced to the page. Display text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error(transparent)]
    Engine(#[from] SentimentError),
}
