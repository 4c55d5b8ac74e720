//! Evidence normalization
//!
//! Evidence arrives as plain strings or as objects from several upstream
//! sources (`sentence`, `description` or `text` holding the body). Everything
//! is normalized into `Evidence` at the boundary.

use crate::similarity::Confidence;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SOURCE: &str = "traveler_review";
pub const DEFAULT_RELEVANCE: f64 = 0.8;

/// One supporting statement for generated content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub text: String,

    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_confidence")]
    pub confidence: Confidence,

    /// 0.0 - 1.0
    #[serde(default = "default_relevance")]
    pub relevance_score: f64,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_confidence() -> Confidence {
    Confidence::Medium
}

fn default_relevance() -> f64 {
    DEFAULT_RELEVANCE
}

impl Evidence {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: default_source(),
            confidence: default_confidence(),
            relevance_score: default_relevance(),
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Normalize one upstream value. Returns `None` when no text can be found.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self::new(s.trim())),
            Value::Object(map) => {
                let text = ["sentence", "description", "text"]
                    .iter()
                    .filter_map(|k| map.get(*k).and_then(|v| v.as_str()))
                    .map(str::trim)
                    .find(|t| !t.is_empty())?;

                let mut evidence = Self::new(text);
                if let Some(source) = map.get("source").and_then(|v| v.as_str()) {
                    evidence.source = source.to_string();
                }
                if let Some(confidence) = map
                    .get("confidence")
                    .and_then(|v| serde_json::from_value::<Confidence>(v.clone()).ok())
                {
                    evidence.confidence = confidence;
                }
                if let Some(relevance) = map
                    .get("relevance_score")
                    .or_else(|| map.get("relevanceScore"))
                    .and_then(|v| v.as_f64())
                {
                    evidence.relevance_score = relevance.clamp(0.0, 1.0);
                }
                Some(evidence)
            }
            _ => None,
        }
    }

    /// Normalize a list, dropping entries with no usable text
    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values.iter().filter_map(Self::from_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_evidence_gets_defaults() {
        let evidence = Evidence::from_value(&json!("Loved the spa")).unwrap();
        assert_eq!(evidence.text, "Loved the spa");
        assert_eq!(evidence.source, DEFAULT_SOURCE);
        assert_eq!(evidence.confidence, Confidence::Medium);
        assert_eq!(evidence.relevance_score, DEFAULT_RELEVANCE);
    }

    #[test]
    fn test_object_field_precedence() {
        let value = json!({
            "description": "Heated pool open all year",
            "text": "ignored",
            "source": "property_listing",
            "confidence": "high"
        });
        let evidence = Evidence::from_value(&value).unwrap();
        assert_eq!(evidence.text, "Heated pool open all year");
        assert_eq!(evidence.source, "property_listing");
        assert_eq!(evidence.confidence, Confidence::High);
    }

    #[test]
    fn test_unusable_values_dropped() {
        let values = vec![json!(""), json!(42), json!({"title": "x"}), json!({"sentence": "ok"})];
        let normalized = Evidence::from_values(&values);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].text, "ok");
    }
}
