//! Generation request value object and its validation

use crate::cache::Fingerprint;
use crate::error::{AffinityError, Result};
use crate::evidence::Evidence;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref TOKEN_KEY: Regex = Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap();
}

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Secondary concepts beyond this count are treated as tertiary
pub const MAX_SECONDARY: usize = 2;

/// Where the generated copy will be shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Surface {
    #[serde(rename = "Property Detail Page")]
    PropertyDetailPage,
    #[serde(rename = "Search Results", alias = "Search Results Page")]
    SearchResults,
    #[serde(rename = "Email Campaign")]
    EmailCampaign,
    #[serde(rename = "Social Media")]
    SocialMedia,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::PropertyDetailPage,
        Surface::SearchResults,
        Surface::EmailCampaign,
        Surface::SocialMedia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::PropertyDetailPage => "Property Detail Page",
            Surface::SearchResults => "Search Results",
            Surface::EmailCampaign => "Email Campaign",
            Surface::SocialMedia => "Social Media",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = AffinityError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "property detail page" | "pdp" => Ok(Surface::PropertyDetailPage),
            "search results" | "search results page" | "srp" => Ok(Surface::SearchResults),
            "email campaign" | "email" => Ok(Surface::EmailCampaign),
            "social media" | "social" => Ok(Surface::SocialMedia),
            _ => Err(AffinityError::InvalidRequest(format!("Unknown surface '{}'", s))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptRef {
    pub id: String,
    pub name: String,
}

impl ConceptRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Percent budget per role
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightAllocation {
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
}

impl Default for WeightAllocation {
    fn default() -> Self {
        Self {
            primary: 50.0,
            secondary: 30.0,
            tertiary: 20.0,
        }
    }
}

impl WeightAllocation {
    pub fn total(&self) -> f64 {
        self.primary + self.secondary + self.tertiary
    }

    /// "p-s-t", as used by the fingerprint
    pub fn label(&self) -> String {
        format!("{}-{}-{}", self.primary, self.secondary, self.tertiary)
    }
}

/// Caller-supplied value for a `{{KEY}}` token
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenOverride {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// First entry is the primary concept
    pub concepts: Vec<ConceptRef>,

    #[serde(default)]
    pub weights: WeightAllocation,

    #[serde(default)]
    pub evidence: Vec<Evidence>,

    pub tone: String,

    pub surface: Surface,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub token_overrides: Vec<TokenOverride>,

    /// Context insights the user selected
    #[serde(default)]
    pub context_insights: Vec<String>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Serialize)]
struct FingerprintKey<'a> {
    primary: &'a str,
    secondary: Vec<&'a str>,
    tone: &'a str,
    surface: &'a str,
    weights: String,
    evidence_count: usize,
}

impl GenerationRequest {
    pub fn new(primary: ConceptRef, tone: &str, surface: Surface) -> Self {
        Self {
            concepts: vec![primary],
            weights: WeightAllocation::default(),
            evidence: Vec::new(),
            tone: tone.to_string(),
            surface,
            language: default_language(),
            token_overrides: Vec::new(),
            context_insights: Vec::new(),
        }
    }

    pub fn with_concept(mut self, concept: ConceptRef) -> Self {
        self.concepts.push(concept);
        self
    }

    pub fn with_weights(mut self, weights: WeightAllocation) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    pub fn with_token(mut self, key: &str, value: &str) -> Self {
        self.token_overrides.push(TokenOverride {
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_context_insight(mut self, insight: &str) -> Self {
        self.context_insights.push(insight.to_string());
        self
    }

    pub fn primary(&self) -> Option<&ConceptRef> {
        self.concepts.first()
    }

    pub fn secondary(&self) -> &[ConceptRef] {
        let end = self.concepts.len().min(1 + MAX_SECONDARY);
        self.concepts.get(1..end).unwrap_or(&[])
    }

    pub fn tertiary(&self) -> &[ConceptRef] {
        self.concepts.get(1 + MAX_SECONDARY..).unwrap_or(&[])
    }

    /// Reject requests that must never reach a backend
    pub fn validate(&self) -> Result<()> {
        let primary = self
            .primary()
            .ok_or_else(|| AffinityError::InvalidRequest("No primary concept".to_string()))?;
        if primary.name.trim().is_empty() {
            return Err(AffinityError::InvalidRequest(
                "Primary concept has no name".to_string(),
            ));
        }

        for (label, weight) in [
            ("primary", self.weights.primary),
            ("secondary", self.weights.secondary),
            ("tertiary", self.weights.tertiary),
        ] {
            if !(0.0..=100.0).contains(&weight) {
                return Err(AffinityError::InvalidRequest(format!(
                    "{} weight {} is outside 0..=100",
                    label, weight
                )));
            }
        }
        if self.weights.total() > 100.0 {
            return Err(AffinityError::InvalidRequest(format!(
                "Weights total {} exceeds 100",
                self.weights.total()
            )));
        }

        for token in &self.token_overrides {
            if !TOKEN_KEY.is_match(&token.key) {
                return Err(AffinityError::InvalidRequest(format!(
                    "Token key '{}' must be UPPER_SNAKE_CASE",
                    token.key
                )));
            }
            if token.value.trim().is_empty() {
                return Err(AffinityError::InvalidRequest(format!(
                    "Token '{}' has an empty value",
                    token.key
                )));
            }
        }
        Ok(())
    }

    /// Cache key over primary, secondaries, tone, surface, weights and
    /// evidence count
    pub fn fingerprint(&self) -> Fingerprint {
        let mut secondary: Vec<&str> = self.secondary().iter().map(|c| c.name.as_str()).collect();
        secondary.sort();
        let key = FingerprintKey {
            primary: self.primary().map(|c| c.name.as_str()).unwrap_or(""),
            secondary,
            tone: &self.tone,
            surface: self.surface.as_str(),
            weights: self.weights.label(),
            evidence_count: self.evidence.len(),
        };
        Fingerprint::of(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            ConceptRef::new("wellness", "Wellness"),
            "Luxury",
            Surface::PropertyDetailPage,
        )
    }

    #[test]
    fn test_surface_parse_and_serde() {
        assert_eq!("pdp".parse::<Surface>().unwrap(), Surface::PropertyDetailPage);
        assert_eq!(
            "Search Results Page".parse::<Surface>().unwrap(),
            Surface::SearchResults
        );
        assert!("billboard".parse::<Surface>().is_err());
        let json = serde_json::to_string(&Surface::SocialMedia).unwrap();
        assert_eq!(json, "\"Social Media\"");
    }

    #[test]
    fn test_hierarchy_slices() {
        let req = request()
            .with_concept(ConceptRef::new("spa", "Spa"))
            .with_concept(ConceptRef::new("pools", "Pools"))
            .with_concept(ConceptRef::new("luxury", "Luxury"));
        assert_eq!(req.secondary().len(), 2);
        assert_eq!(req.tertiary()[0].id, "luxury");
        assert!(request().tertiary().is_empty());
    }

    #[test]
    fn test_validation_rules() {
        assert!(request().validate().is_ok());

        let mut empty = request();
        empty.concepts.clear();
        assert!(matches!(empty.validate(), Err(AffinityError::InvalidRequest(_))));

        let bad_key = request().with_token("property name", "X");
        assert!(bad_key.validate().is_err());

        let empty_value = request().with_token("PROPERTY_NAME", " ");
        assert!(empty_value.validate().is_err());

        let over = request().with_weights(WeightAllocation {
            primary: 60.0,
            secondary: 30.0,
            tertiary: 20.0,
        });
        assert!(over.validate().is_err());

        let negative = request().with_weights(WeightAllocation {
            primary: -1.0,
            secondary: 30.0,
            tertiary: 20.0,
        });
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_fingerprint_ignores_secondary_order() {
        let a = request()
            .with_concept(ConceptRef::new("spa", "Spa"))
            .with_concept(ConceptRef::new("pools", "Pools"));
        let b = request()
            .with_concept(ConceptRef::new("pools", "Pools"))
            .with_concept(ConceptRef::new("spa", "Spa"));
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = a.clone().with_evidence(Evidence::new("Great spa"));
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
