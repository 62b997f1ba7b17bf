//! Prediction pipeline orchestration.

use std::sync::Arc;

use senti_core::{IndexingPolicy, SearchHit, SentimentResult};

use crate::classifier::Classifier;
use crate::error::SentimentError;
use crate::indexer::Indexer;
use crate::normalize::{collapse_whitespace, normalize_text};

/// What happened to the record after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Stored { id: String },
    /// Only produced under [`IndexingPolicy::BestEffort`].
    Failed { reason: String },
}

/// Result of one [`PredictionService::predict`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub result: SentimentResult,
    pub indexing: IndexOutcome,
}

/// Normalizer → classifier → indexer, one call per request.
pub struct PredictionService {
    classifier: Classifier,
    indexer: Arc<Indexer>,
    policy: IndexingPolicy,
}

impl PredictionService {
    #[must_use]
    pub fn new(classifier: Classifier, indexer: Arc<Indexer>, policy: IndexingPolicy) -> Self {
        Self {
            classifier,
            indexer,
            policy,
        }
    }

    /// Shared handle to the indexer, for read-only search callers.
    #[must_use]
    pub fn indexer(&self) -> Arc<Indexer> {
        Arc::clone(&self.indexer)
    }

    #[must_use]
    pub fn policy(&self) -> IndexingPolicy {
        self.policy
    }

    /// Run the full pipeline for one text.
    ///
    /// 1. Normalize the raw text. If that leaves nothing from non-blank input
    ///    (a bare URL, only markup), fall back to the whitespace-collapsed raw
    ///    text.
    /// 2. Classify the normalized text.
    /// 3. Embed and store the normalized text with its label and confidence.
    ///
    /// The sequence is not atomic. Under [`IndexingPolicy::Required`] a
    /// storage failure fails the call even though classification succeeded;
    /// under [`IndexingPolicy::BestEffort`] it is logged and reported in
    /// [`Prediction::indexing`].
    ///
    /// # Errors
    ///
    /// - [`SentimentError::EmptyInput`] if the raw text is blank.
    /// - Any classifier error.
    /// - Any indexer error under the required policy.
    pub async fn predict(&self, text: &str) -> Result<Prediction, SentimentError> {
        let mut normalized = normalize_text(text);
        if normalized.is_empty() {
            normalized = collapse_whitespace(text);
            if !normalized.is_empty() {
                tracing::debug!("normalization removed all content, using raw text");
            }
        }
        let result = self.classifier.classify(&normalized).await?;

        let indexing = match self.indexer.add_record(&normalized, result).await {
            Ok(record) => IndexOutcome::Stored { id: record.id },
            Err(e) => match self.policy {
                IndexingPolicy::Required => {
                    tracing::error!(error = %e, "indexing failed, failing prediction");
                    return Err(e);
                }
                IndexingPolicy::BestEffort => {
                    tracing::warn!(error = %e, "indexing failed, returning classification anyway");
                    IndexOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            },
        };

        tracing::info!(
            sentiment = %result.sentiment,
            confidence = result.confidence,
            chars = normalized.chars().count(),
            "prediction complete"
        );

        Ok(Prediction { result, indexing })
    }

    /// Similarity search over stored predictions.
    ///
    /// # Errors
    ///
    /// Propagates indexer errors.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, SentimentError> {
        self.indexer.similarity_search(query, top_k).await
    }
}
