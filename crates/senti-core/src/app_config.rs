use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// What the prediction service does when storing a classified record fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingPolicy {
    /// The whole prediction fails.
    Required,
    /// The failure is logged and the classification is still returned.
    BestEffort,
}

/// Which vector store implementation backs the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Qdrant,
    Memory,
}

/// How the front-end reaches the similarity search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRoute {
    /// Query the indexer in-process.
    Direct,
    /// Go through the API's `POST /search`.
    Api,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_bind_addr: SocketAddr,
    pub ui_bind_addr: SocketAddr,
    pub api_url: String,
    pub ui_api_timeout_secs: u64,
    pub ui_search_route: SearchRoute,
    pub store_backend: StoreBackend,
    pub store_host: String,
    pub store_port: u16,
    pub store_collection: String,
    pub embedding_dim: usize,
    pub classifier_url: String,
    pub embedder_url: String,
    pub classifier_model: String,
    pub max_input_tokens: usize,
    pub indexing_policy: IndexingPolicy,
    pub hf_offline: bool,
    pub model_cache_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Base URL of the vector store, e.g. `http://localhost:6333`.
    #[must_use]
    pub fn store_url(&self) -> String {
        format!("http://{}:{}", self.store_host, self.store_port)
    }

    /// Base URL of the API, derived from [`AppConfig::api_url`] by dropping
    /// the trailing `/predict` segment.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api_url
            .trim_end_matches('/')
            .trim_end_matches("/predict")
    }
}
