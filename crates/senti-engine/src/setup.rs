//! Builds engine components from [`AppConfig`].

use std::sync::Arc;

use senti_core::{AppConfig, StoreBackend};

use crate::classifier::Classifier;
use crate::embeddings::TeiEmbedder;
use crate::error::SentimentError;
use crate::indexer::Indexer;
use crate::pipeline::PredictionService;
use crate::truncate::Truncator;
use crate::vector_store::{MemoryStore, QdrantStore, VectorStore};

/// Open the configured vector store backend.
///
/// # Errors
///
/// Returns [`SentimentError::Http`] if the Qdrant HTTP client cannot be built.
pub fn build_store(config: &AppConfig) -> Result<Arc<dyn VectorStore>, SentimentError> {
    match config.store_backend {
        StoreBackend::Qdrant => {
            let url = config.store_url();
            tracing::info!(%url, collection = %config.store_collection, "using qdrant store");
            Ok(Arc::new(QdrantStore::new(&url, &config.store_collection)?))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Build an [`Indexer`] over the configured embedder and store and make sure
/// the collection exists.
///
/// # Errors
///
/// Propagates client construction and collection setup errors.
pub async fn build_indexer(config: &AppConfig) -> Result<Indexer, SentimentError> {
    let embedder = TeiEmbedder::new(&config.embedder_url)?;
    let indexer = Indexer::new(embedder, build_store(config)?, config.embedding_dim);
    indexer.ensure_collection().await?;
    Ok(indexer)
}

/// Build the full prediction service: tokenizer, classifier and indexer.
///
/// # Errors
///
/// Returns [`SentimentError::ModelUnavailable`] when the classifier's
/// tokenizer cannot be resolved, plus anything [`build_indexer`] returns.
pub async fn build_prediction_service(
    config: &AppConfig,
) -> Result<PredictionService, SentimentError> {
    let truncator = Truncator::load(
        &config.classifier_model,
        config.max_input_tokens,
        config.model_cache_dir.as_deref(),
        config.hf_offline,
    )
    .await?;
    let classifier = Classifier::new(&config.classifier_url, Some(truncator))?;
    let indexer = build_indexer(config).await?;

    tracing::info!(
        classifier = %config.classifier_url,
        embedder = %config.embedder_url,
        policy = ?config.indexing_policy,
        "prediction service ready"
    );

    Ok(PredictionService::new(
        classifier,
        Arc::new(indexer),
        config.indexing_policy,
    ))
}
