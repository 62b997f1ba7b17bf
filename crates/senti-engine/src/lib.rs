//! Prediction-and-indexing pipeline for senti.
//!
//! Normalizes input text, classifies it with a TEI-served sequence
//! classifier, embeds it with a TEI-served sentence encoder, and stores the
//! record in a vector collection (Qdrant, or an in-memory store for local runs).

pub mod classifier;
pub mod embeddings;
pub mod error;
pub mod indexer;
pub mod normalize;
pub mod pipeline;
pub mod setup;
pub mod truncate;
pub mod vector_store;

pub use classifier::Classifier;
pub use embeddings::TeiEmbedder;
pub use error::SentimentError;
pub use indexer::{Indexer, PredictionRecord};
pub use normalize::{collapse_whitespace, normalize_text};
pub use pipeline::{IndexOutcome, Prediction, PredictionService};
pub use setup::{build_indexer, build_prediction_service, build_store};
pub use truncate::Truncator;
pub use vector_store::{MemoryStore, QdrantStore, StoredPoint, VectorStore};
