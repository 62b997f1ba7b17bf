//! HTTP client for the prediction API.

use std::time::Duration;

use senti_core::{SearchHit, SentimentResult};
use serde::{Deserialize, Serialize};

use crate::error::UiError;

#[derive(Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

pub struct ApiClient {
    client: reqwest::Client,
    predict_url: String,
    search_url: String,
}

impl ApiClient {
    /// Build a client with a fixed per-request `timeout`. Proxy environment
    /// variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Http`] if the HTTP client cannot be built.
    pub fn new(predict_url: &str, search_url: &str, timeout: Duration) -> Result<Self, UiError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            predict_url: predict_url.to_string(),
            search_url: search_url.to_string(),
        })
    }

    /// `POST {predict_url}` with `{"text": ...}`. Not retried.
    ///
    /// # Errors
    ///
    /// Transport failure or timeout, non-2xx status, or an undecodable body.
    pub async fn predict(&self, text: &str) -> Result<SentimentResult, UiError> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&PredictRequest { text })
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// `POST {search_url}` with `{"query": ..., "top_k": ...}`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::predict`].
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, UiError> {
        let response = self
            .client
            .post(&self.search_url)
            .json(&SearchRequest { query, top_k })
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.results)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, UiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UiError::Status { status, body })
}
