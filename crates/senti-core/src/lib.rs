//! Shared domain types and environment configuration for senti.

pub mod app_config;
pub mod config;
mod sentiment;

pub use app_config::{AppConfig, Environment, IndexingPolicy, SearchRoute, StoreBackend};
pub use config::{load_app_config, load_app_config_from_env};
pub use sentiment::{round_confidence, SearchHit, Sentiment, SentimentResult};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown sentiment label: {0}")]
    UnknownLabel(String),
}
