//! Vector collection backends.

mod memory;
mod qdrant;

pub use memory::MemoryStore;
pub use qdrant::QdrantStore;

use async_trait::async_trait;
use senti_core::{SearchHit, Sentiment};

use crate::error::SentimentError;

/// A record as written to the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub document: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

/// A named collection of embedded documents with sentiment metadata.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist yet.
    async fn ensure_collection(&self, dim: usize) -> Result<(), SentimentError>;

    /// Insert one point. Ids are never reused, so this never overwrites.
    async fn insert(&self, point: StoredPoint) -> Result<(), SentimentError>;

    /// Return up to `limit` points nearest to `vector`, nearest first.
    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, SentimentError>;
}
