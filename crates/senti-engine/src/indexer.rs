//! Embeds classified text and keeps it searchable.

use std::sync::Arc;

use senti_core::{SearchHit, Sentiment, SentimentResult};
use uuid::Uuid;

use crate::embeddings::TeiEmbedder;
use crate::error::SentimentError;
use crate::vector_store::{StoredPoint, VectorStore};

/// A classified text as persisted in the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub embedding: Vec<f32>,
}

/// Embedding model plus vector collection.
///
/// Holds no state beyond the two handles, so one instance can serve every
/// request concurrently.
pub struct Indexer {
    embedder: TeiEmbedder,
    store: Arc<dyn VectorStore>,
    dim: usize,
}

impl Indexer {
    #[must_use]
    pub fn new(embedder: TeiEmbedder, store: Arc<dyn VectorStore>, dim: usize) -> Self {
        Self {
            embedder,
            store,
            dim,
        }
    }

    /// Create the collection if needed. Call once at startup.
    ///
    /// # Errors
    ///
    /// Propagates the store's error.
    pub async fn ensure_collection(&self) -> Result<(), SentimentError> {
        self.store.ensure_collection(self.dim).await
    }

    /// Embed `text` and insert it under a fresh id.
    ///
    /// Nothing is rolled back or retried: an embedding or store failure is
    /// returned as-is.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::Tei`] if embedding fails.
    /// - [`SentimentError::DimensionMismatch`] if the embedding length differs
    ///   from the collection's.
    /// - The store's error if the insert fails.
    pub async fn add_record(
        &self,
        text: &str,
        result: SentimentResult,
    ) -> Result<PredictionRecord, SentimentError> {
        let embedding = self.embed_checked(text).await?;
        let id = Uuid::new_v4().to_string();

        self.store
            .insert(StoredPoint {
                id: id.clone(),
                vector: embedding.clone(),
                document: text.to_string(),
                sentiment: result.sentiment,
                confidence: result.confidence,
            })
            .await?;

        tracing::debug!(%id, sentiment = %result.sentiment, "record indexed");

        Ok(PredictionRecord {
            id,
            text: text.to_string(),
            sentiment: result.sentiment,
            confidence: result.confidence,
            embedding,
        })
    }

    /// Return the `top_k` stored records nearest to `query`, nearest first.
    ///
    /// `top_k == 0` short-circuits to an empty result.
    ///
    /// # Errors
    ///
    /// Same as [`Indexer::add_record`], for the query embedding and the
    /// store lookup.
    pub async fn similarity_search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, SentimentError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embed_checked(query).await?;
        self.store.query(&embedding, top_k).await
    }

    async fn embed_checked(&self, text: &str) -> Result<Vec<f32>, SentimentError> {
        let embedding = self.embedder.embed_one(text).await?;
        if embedding.len() != self.dim {
            return Err(SentimentError::DimensionMismatch {
                expected: self.dim,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}
