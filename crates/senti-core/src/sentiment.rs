use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Binary sentiment label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = CoreError;

    /// Accepts the model's id2label names case-insensitively, plus the raw
    /// `LABEL_0` / `LABEL_1` ids some exports fall back to.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Ok(Sentiment::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Ok(Sentiment::Negative),
            _ => Err(CoreError::UnknownLabel(s.to_string())),
        }
    }
}

/// Classifier output returned to callers. Not persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    /// Softmax probability of `sentiment`, rounded to 4 decimals.
    pub confidence: f64,
}

/// One ranked match from a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub document: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    /// Similarity score reported by the store (higher is closer).
    pub score: f32,
}

/// Round a probability to 4 decimal places and clamp it to `[0, 1]`.
#[must_use]
pub fn round_confidence(p: f64) -> f64 {
    ((p * 10_000.0).round() / 10_000.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_labels_case_insensitively() {
        assert_eq!("POSITIVE".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!("LABEL_1".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("label_0".parse::<Sentiment>().unwrap(), Sentiment::Negative);
    }

    #[test]
    fn rejects_neutral_label() {
        let err = "NEUTRAL".parse::<Sentiment>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownLabel(ref l) if l == "NEUTRAL"));
    }

    #[test]
    fn serializes_uppercase() {
        let result = SentimentResult {
            sentiment: Sentiment::Negative,
            confidence: 0.9876,
        };
        let json = serde_json::to_value(result).expect("serialize");
        assert_eq!(json["sentiment"], "NEGATIVE");
        assert_eq!(json["confidence"], 0.9876);
    }

    #[test]
    fn round_confidence_keeps_four_decimals() {
        assert!((round_confidence(0.998_765_4) - 0.9988).abs() < f64::EPSILON);
        assert!((round_confidence(0.5) - 0.5).abs() < f64::EPSILON);
        assert!((round_confidence(1.000_01) - 1.0).abs() < f64::EPSILON);
    }
}
