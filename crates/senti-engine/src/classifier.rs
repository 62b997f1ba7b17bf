//! Sequence classification through a TEI `/predict` endpoint.

use serde::{Deserialize, Serialize};
use senti_core::{round_confidence, Sentiment, SentimentResult};

use crate::error::SentimentError;
use crate::truncate::Truncator;

/// Binary sentiment classifier backed by a TEI server.
///
/// Construct once at startup and share; both the HTTP client and the
/// tokenizer are safe to use from concurrent requests.
pub struct Classifier {
    client: reqwest::Client,
    url: String,
    truncator: Option<Truncator>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    truncate: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// TEI answers a single input with a flat list and a batch with nested lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Single(Vec<LabelScore>),
    Batch(Vec<Vec<LabelScore>>),
}

impl Classifier {
    /// Create a classifier calling `{tei_url}/predict`.
    ///
    /// When a [`Truncator`] is given, inputs are cut to its token budget
    /// before they are sent.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(tei_url: &str, truncator: Option<Truncator>) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            url: format!("{}/predict", tei_url.trim_end_matches('/')),
            truncator,
        })
    }

    /// Classify already-normalized text.
    ///
    /// Confidence is the probability of the winning label, rounded to four
    /// decimals. Overlong input is truncated, never rejected.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::EmptyInput`] for empty text.
    /// - [`SentimentError::Tei`] on transport failure, non-2xx status or an
    ///   unparseable body.
    /// - [`SentimentError::UnknownLabel`] if the model answers with a label
    ///   other than POSITIVE/NEGATIVE.
    pub async fn classify(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        if text.trim().is_empty() {
            return Err(SentimentError::EmptyInput);
        }

        let input = match &self.truncator {
            Some(truncator) => truncator.truncate(text)?,
            None => std::borrow::Cow::Borrowed(text),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&PredictRequest {
                inputs: &input,
                truncate: true,
            })
            .send()
            .await
            .map_err(|e| SentimentError::Tei(format!("TEI predict request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Tei(format!(
                "TEI predict returned status {status}: {body}"
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Tei(format!("TEI predict response parse error: {e}")))?;

        let scores = match parsed {
            PredictResponse::Single(scores) => scores,
            PredictResponse::Batch(mut batch) => batch.pop().unwrap_or_default(),
        };

        pick_top(scores)
    }
}

fn pick_top(scores: Vec<LabelScore>) -> Result<SentimentResult, SentimentError> {
    let top = scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| SentimentError::Tei("TEI predict returned no labels".to_string()))?;

    let sentiment: Sentiment = top
        .label
        .parse()
        .map_err(|_| SentimentError::UnknownLabel(top.label.clone()))?;

    Ok(SentimentResult {
        sentiment,
        confidence: round_confidence(top.score),
    })
}
