use std::sync::RwLock;

use async_trait::async_trait;
use senti_core::SearchHit;

use super::{StoredPoint, VectorStore};
use crate::error::SentimentError;

/// Process-local collection scored by brute-force cosine similarity.
///
/// Contents are lost on restart. Ties keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    points: RwLock<Vec<StoredPoint>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().len(), |points| points.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn ensure_collection(&self, _dim: usize) -> Result<(), SentimentError> {
        Ok(())
    }

    async fn insert(&self, point: StoredPoint) -> Result<(), SentimentError> {
        self.points
            .write()
            .map_err(|e| SentimentError::Store(format!("memory store lock poisoned: {e}")))?
            .push(point);
        Ok(())
    }

    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, SentimentError> {
        let points = self
            .points
            .read()
            .map_err(|e| SentimentError::Store(format!("memory store lock poisoned: {e}")))?;

        let mut scored: Vec<(f32, &StoredPoint)> = points
            .iter()
            .map(|p| (cosine_similarity(vector, &p.vector), p))
            .collect();

        // stable sort: equal scores stay in insertion order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, p)| SearchHit {
                id: p.id.clone(),
                document: p.document.clone(),
                sentiment: p.sentiment,
                confidence: p.confidence,
                score,
            })
            .collect())
    }
}
