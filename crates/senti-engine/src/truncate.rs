//! Token-length truncation using the classifier's own tokenizer.
//!
//! The tokenizer is resolved from the local Hugging Face cache. In offline
//! mode a cache miss is an error; otherwise the file is fetched from the hub.

use std::borrow::Cow;
use std::path::Path;
use std::path::PathBuf;

use tokenizers::{Tokenizer, TruncationParams};

use crate::error::SentimentError;

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Cuts text down to the prefix the classifier would actually read.
pub struct Truncator {
    tokenizer: Tokenizer,
    max_tokens: usize,
}

impl Truncator {
    /// Resolve `tokenizer.json` for `repo` and build a truncator.
    ///
    /// `cache_dir` is the hub cache directory (`$HF_HOME/hub`); `None` uses
    /// the hf-hub default.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::ModelUnavailable`] if the file is not cached
    /// (offline) or cannot be downloaded, and [`SentimentError::Tokenizer`] if
    /// it cannot be parsed.
    pub async fn load(
        repo: &str,
        max_tokens: usize,
        cache_dir: Option<&Path>,
        offline: bool,
    ) -> Result<Self, SentimentError> {
        let path = resolve_tokenizer_file(repo, cache_dir, offline).await?;
        tracing::info!(repo, path = %path.display(), max_tokens, "loading tokenizer");
        Self::from_file(&path, max_tokens)
    }

    /// Build a truncator from a `tokenizer.json` on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Tokenizer`] if the file cannot be parsed.
    pub fn from_file(path: &Path, max_tokens: usize) -> Result<Self, SentimentError> {
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            SentimentError::Tokenizer(format!("failed to load {}: {e}", path.display()))
        })?;
        Self::from_tokenizer(tokenizer, max_tokens)
    }

    /// Wrap an already constructed tokenizer.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Tokenizer`] if truncation cannot be configured.
    pub fn from_tokenizer(
        mut tokenizer: Tokenizer,
        max_tokens: usize,
    ) -> Result<Self, SentimentError> {
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_tokens,
                ..TruncationParams::default()
            }))
            .map_err(|e| SentimentError::Tokenizer(format!("invalid truncation setup: {e}")))?;

        Ok(Self {
            tokenizer,
            max_tokens,
        })
    }

    /// Return the longest prefix of `text` that fits in `max_tokens` tokens,
    /// special tokens included. Text that already fits is borrowed unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Tokenizer`] if encoding fails.
    pub fn truncate<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, SentimentError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| SentimentError::Tokenizer(format!("encoding failed: {e}")))?;

        if encoding.get_overflowing().is_empty() {
            return Ok(Cow::Borrowed(text));
        }

        let end = encoding
            .get_offsets()
            .iter()
            .zip(encoding.get_special_tokens_mask())
            .filter(|&(_, &special)| special == 0)
            .map(|(&(_, end), _)| end)
            .max()
            .unwrap_or(0);

        let cut = floor_char_boundary(text, end);
        tracing::debug!(
            original_bytes = text.len(),
            kept_bytes = cut,
            max_tokens = self.max_tokens,
            "input truncated"
        );
        Ok(Cow::Owned(text[..cut].trim_end().to_string()))
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

async fn resolve_tokenizer_file(
    repo: &str,
    cache_dir: Option<&Path>,
    offline: bool,
) -> Result<PathBuf, SentimentError> {
    let cache = cache_dir.map_or_else(hf_hub::Cache::from_env, |dir| {
        hf_hub::Cache::new(dir.to_path_buf())
    });

    if let Some(path) = cache.model(repo.to_string()).get(TOKENIZER_FILE) {
        return Ok(path);
    }

    let unavailable = || SentimentError::ModelUnavailable {
        repo: repo.to_string(),
        file: TOKENIZER_FILE.to_string(),
    };

    if offline {
        tracing::error!(repo, "tokenizer not in local cache and hub access is disabled");
        return Err(unavailable());
    }

    let mut builder = hf_hub::api::tokio::ApiBuilder::new();
    if let Some(dir) = cache_dir {
        builder = builder.with_cache_dir(dir.to_path_buf());
    }
    let api = builder.build().map_err(|e| {
        tracing::error!(error = %e, "failed to initialise hub client");
        unavailable()
    })?;

    api.model(repo.to_string())
        .get(TOKENIZER_FILE)
        .await
        .map_err(|e| {
            tracing::error!(repo, error = %e, "tokenizer download failed");
            unavailable()
        })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    /// Word-level tokenizer with no special tokens: one token per word.
    fn word_tokenizer() -> Tokenizer {
        let json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {
                    "[UNK]": 0, "one": 1, "two": 2, "three": 3, "four": 4, "five": 5
                },
                "unk_token": "[UNK]"
            }
        });
        Tokenizer::from_str(&json.to_string()).expect("valid tokenizer json")
    }

    #[test]
    fn short_text_is_borrowed_unchanged() {
        let truncator = Truncator::from_tokenizer(word_tokenizer(), 8).unwrap();
        let out = truncator.truncate("one two three").unwrap();
        assert!(matches!(out, Cow::Borrowed("one two three")));
    }

    #[test]
    fn long_text_is_cut_at_last_kept_token() {
        let truncator = Truncator::from_tokenizer(word_tokenizer(), 3).unwrap();
        let out = truncator.truncate("one two three four five").unwrap();
        assert_eq!(out, "one two three");
    }

    #[test]
    fn unknown_words_still_count_as_tokens() {
        let truncator = Truncator::from_tokenizer(word_tokenizer(), 2).unwrap();
        let out = truncator.truncate("zebra yak one").unwrap();
        assert_eq!(out, "zebra yak");
    }

    #[test]
    fn floor_char_boundary_backs_off_multibyte() {
        let text = "héllo";
        // byte 2 is inside 'é'
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(floor_char_boundary(text, 99), text.len());
    }

    #[tokio::test]
    async fn offline_cache_miss_is_model_unavailable() {
        let dir = std::env::temp_dir().join(format!("senti-empty-cache-{}", std::process::id()));
        let err = Truncator::load("nobody/no-such-model", 256, Some(&dir), true)
            .await
            .err()
            .expect("offline miss must fail");
        assert!(matches!(err, SentimentError::ModelUnavailable { ref repo, .. } if repo == "nobody/no-such-model"));
    }
}
