//! Qdrant REST client for the prediction collection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use senti_core::{SearchHit, Sentiment};

use super::{StoredPoint, VectorStore};
use crate::error::SentimentError;

/// Qdrant HTTP client bound to one collection.
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorsConfig,
}

#[derive(Serialize)]
struct VectorsConfig {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertPointsRequest<'a> {
    points: [Point<'a>; 1],
}

#[derive(Serialize)]
struct Point<'a> {
    id: &'a str,
    vector: &'a [f32],
    payload: Payload,
}

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    document: String,
    sentiment: Sentiment,
    confidence: f64,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: serde_json::Value,
    score: f32,
    payload: Option<Payload>,
}

impl QdrantStore {
    /// Create a new `QdrantStore`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(qdrant_url: &str, collection: &str) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            base_url: qdrant_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    /// Uses cosine distance.
    async fn ensure_collection(&self, dim: usize) -> Result<(), SentimentError> {
        let url = self.collection_url();
        let check = self.client.get(&url).send().await;

        if let Ok(resp) = check {
            if resp.status().is_success() {
                tracing::debug!(collection = %self.collection, "collection already exists");
                return Ok(());
            }
        }

        let body = CreateCollectionRequest {
            vectors: VectorsConfig {
                size: dim,
                distance: "Cosine",
            },
        };

        let resp = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                SentimentError::Qdrant(format!("collection create request failed: {e}"))
            })?;

        if !resp.status().is_success() {
            return Err(SentimentError::Qdrant(format!(
                "collection create returned status {}",
                resp.status()
            )));
        }

        tracing::info!(collection = %self.collection, dim, "created collection");
        Ok(())
    }

    async fn insert(&self, point: StoredPoint) -> Result<(), SentimentError> {
        let body = UpsertPointsRequest {
            points: [Point {
                id: &point.id,
                vector: &point.vector,
                payload: Payload {
                    document: point.document.clone(),
                    sentiment: point.sentiment,
                    confidence: point.confidence,
                },
            }],
        };

        let url = format!("{}/points?wait=true", self.collection_url());

        let resp = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SentimentError::Qdrant(format!("upsert request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SentimentError::Qdrant(format!(
                "upsert returned status {}",
                resp.status()
            )));
        }

        Ok(())
    }

    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, SentimentError> {
        let url = format!("{}/points/search", self.collection_url());

        let resp = self
            .client
            .post(&url)
            .json(&SearchRequest {
                vector,
                limit,
                with_payload: true,
            })
            .send()
            .await
            .map_err(|e| SentimentError::Qdrant(format!("search request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SentimentError::Qdrant(format!(
                "search returned status {}",
                resp.status()
            )));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SentimentError::Qdrant(format!("search response parse error: {e}")))?;

        parsed
            .result
            .into_iter()
            .map(into_hit)
            .collect::<Result<Vec<_>, _>>()
    }
}

fn into_hit(point: ScoredPoint) -> Result<SearchHit, SentimentError> {
    let id = match point.id {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    };
    let payload = point
        .payload
        .ok_or_else(|| SentimentError::Qdrant(format!("point {id} has no payload")))?;

    Ok(SearchHit {
        id,
        document: payload.document,
        sentiment: payload.sentiment,
        confidence: payload.confidence,
        score: point.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_hit_accepts_uuid_and_numeric_ids() {
        let point: ScoredPoint = serde_json::from_value(serde_json::json!({
            "id": "7f0d5c8e-3f7a-4c8e-9a51-0d3c1e2b4a6f",
            "version": 3,
            "score": 0.93,
            "payload": { "document": "great", "sentiment": "POSITIVE", "confidence": 0.99 }
        }))
        .unwrap();
        let hit = into_hit(point).unwrap();
        assert_eq!(hit.id, "7f0d5c8e-3f7a-4c8e-9a51-0d3c1e2b4a6f");
        assert_eq!(hit.sentiment, Sentiment::Positive);

        let point: ScoredPoint = serde_json::from_value(serde_json::json!({
            "id": 42,
            "score": 0.5,
            "payload": { "document": "meh", "sentiment": "NEGATIVE", "confidence": 0.51 }
        }))
        .unwrap();
        assert_eq!(into_hit(point).unwrap().id, "42");
    }

    #[test]
    fn into_hit_requires_payload() {
        let point: ScoredPoint =
            serde_json::from_value(serde_json::json!({ "id": 1, "score": 0.1 })).unwrap();
        assert!(matches!(into_hit(point), Err(SentimentError::Qdrant(_))));
    }
}
