//! TEI (Text Embeddings Inference) client for vector generation.

use serde::Serialize;

use crate::error::SentimentError;

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 32;

/// TEI HTTP client serving the sentence encoder.
pub struct TeiEmbedder {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
    truncate: bool,
}

impl TeiEmbedder {
    /// Create a new `TeiEmbedder` calling `{tei_url}/embed`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(tei_url: &str) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
        })
    }

    /// Generate embeddings for a batch of texts.
    ///
    /// Texts are sent in groups of [`BATCH_SIZE`]. Returns one vector per
    /// input text, in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Tei`] if the request fails, the response
    /// cannot be parsed, or the server returns the wrong number of vectors.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SentimentError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = EmbedRequest {
                inputs: chunk,
                truncate: true,
            };
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| SentimentError::Tei(format!("TEI embed request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(SentimentError::Tei(format!(
                    "TEI embed returned status {}",
                    response.status()
                )));
            }

            let embeddings: Vec<Vec<f32>> = response
                .json()
                .await
                .map_err(|e| SentimentError::Tei(format!("TEI embed response parse error: {e}")))?;

            if embeddings.len() != chunk.len() {
                return Err(SentimentError::Tei(format!(
                    "TEI returned {} embeddings for {} inputs",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Same as [`TeiEmbedder::embed`].
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, SentimentError> {
        self.embed(&[text])
            .await?
            .pop()
            .ok_or_else(|| SentimentError::Tei("TEI returned no embedding".to_string()))
    }
}
