//! Front-end logic behind the page: calls the API, keeps a short history and
//! renders results as display strings.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::Arc;

use senti_core::{SearchHit, Sentiment, SentimentResult};
use senti_engine::Indexer;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::api_client::ApiClient;
use crate::error::UiError;

/// Confidence strictly below this is displayed as `UNCERTAIN`.
pub const UNCERTAIN_THRESHOLD: f64 = 0.6;
pub const HISTORY_CAPACITY: usize = 5;
pub const EXAMPLES: [&str; 3] = [
    "I love this product",
    "This is the worst service",
    "The movie was okay",
];

const SIMILAR_SHOWN: usize = 3;
const SEARCH_SHOWN: usize = 5;
const HISTORY_PREVIEW_CHARS: usize = 40;
const DOCUMENT_PREVIEW_CHARS: usize = 80;
const API_ERROR_HTML: &str = "<h3 style='color:red'>API Error</h3>";

/// Everything the page redraws after analyze or clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisView {
    pub sentiment_html: String,
    pub confidence: f64,
    pub history: String,
    pub similar: String,
    /// Raw error text after a failed API call, empty otherwise.
    pub message: String,
}

impl AnalysisView {
    fn api_error(error: &UiError) -> Self {
        Self {
            sentiment_html: API_ERROR_HTML.to_string(),
            message: error.to_string(),
            ..Self::default()
        }
    }
}

/// Most recent submissions, oldest first, capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<String>,
}

impl History {
    pub fn push(&mut self, entry: String) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Where similarity lookups go.
pub enum SearchSource {
    /// Straight to the vector store, bypassing the API. Read-only.
    Direct(Arc<Indexer>),
    /// Through the API's `POST /search`.
    Api,
}

pub struct FrontEnd {
    api: ApiClient,
    search: SearchSource,
    history: Mutex<History>,
}

impl FrontEnd {
    #[must_use]
    pub fn new(api: ApiClient, search: SearchSource) -> Self {
        Self {
            api,
            search,
            history: Mutex::new(History::default()),
        }
    }

    /// Classify `text` through the API and refresh every output.
    ///
    /// Blank input returns an empty view without contacting the API. An API
    /// failure returns the error view and leaves history untouched.
    pub async fn analyze(&self, text: &str) -> AnalysisView {
        if text.trim().is_empty() {
            return AnalysisView::default();
        }

        let result = match self.api.predict(text).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "prediction API call failed");
                return AnalysisView::api_error(&e);
            }
        };

        let history = {
            let mut history = self.history.lock().await;
            history.push(history_entry(text, &result));
            history.render()
        };

        let similar = match self.similar(text, SIMILAR_SHOWN).await {
            Ok(hits) => render_similar(&hits),
            Err(e) => {
                tracing::warn!(error = %e, "similarity lookup failed");
                String::new()
            }
        };

        AnalysisView {
            sentiment_html: sentiment_html(&result),
            confidence: result.confidence,
            history,
            similar,
            message: String::new(),
        }
    }

    /// Reset the outputs. History and stored records are kept.
    #[must_use]
    pub fn clear(&self) -> AnalysisView {
        AnalysisView::default()
    }

    /// Top matches for `query`, one line each, or the error text.
    pub async fn search(&self, query: &str) -> String {
        if query.trim().is_empty() {
            return String::new();
        }
        match self.similar(query, SEARCH_SHOWN).await {
            Ok(hits) => render_search(&hits),
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                format!("Search error: {e}")
            }
        }
    }

    #[must_use]
    pub fn examples(&self) -> &'static [&'static str] {
        &EXAMPLES
    }

    async fn similar(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, UiError> {
        match &self.search {
            SearchSource::Direct(indexer) => Ok(indexer.similarity_search(query, top_k).await?),
            SearchSource::Api => self.api.search(query, top_k).await,
        }
    }
}

/// Label shown to the user. The model's own label is not changed.
#[must_use]
pub fn display_label(result: &SentimentResult) -> &'static str {
    if result.confidence < UNCERTAIN_THRESHOLD {
        "UNCERTAIN"
    } else {
        result.sentiment.as_str()
    }
}

fn sentiment_html(result: &SentimentResult) -> String {
    let color = match result.sentiment {
        Sentiment::Positive => "green",
        Sentiment::Negative => "red",
    };
    format!(
        r#"<h2 style="text-align:center; color:{color};">{}</h2>"#,
        display_label(result)
    )
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// `0.9` stays `0.9`, `1.0` prints as `1.0` rather than `1`.
fn format_confidence(confidence: f64) -> String {
    if confidence.fract() == 0.0 {
        format!("{confidence:.1}")
    } else {
        confidence.to_string()
    }
}

fn history_entry(text: &str, result: &SentimentResult) -> String {
    format!(
        "{}... → {} ({})",
        preview(text, HISTORY_PREVIEW_CHARS),
        result.sentiment,
        format_confidence(result.confidence)
    )
}

fn render_similar(hits: &[SearchHit]) -> String {
    hits.iter().fold(String::new(), |mut out, hit| {
        let _ = writeln!(
            out,
            "- {}... | {}",
            preview(&hit.document, DOCUMENT_PREVIEW_CHARS),
            hit.sentiment
        );
        out
    })
}

fn render_search(hits: &[SearchHit]) -> String {
    hits.iter().fold(String::new(), |mut out, hit| {
        let _ = writeln!(
            out,
            "- {}... | Sentiment: {}",
            preview(&hit.document, DOCUMENT_PREVIEW_CHARS),
            hit.sentiment
        );
        out
    })
}
