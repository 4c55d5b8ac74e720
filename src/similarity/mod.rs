//! Similarity - Multi-dimensional concept similarity scoring
//!
//! Nine independent dimension scorers share one contract: normalize both IDs,
//! read the immutable knowledge base, return a score/confidence/evidence triple.
//! `SimilarityEngine` delegates a named dimension to its scorer or combines all
//! nine into a weighted mean.

pub mod attribute;
pub mod behavioral;
pub mod business;
pub mod engine;
pub mod placeholder;
pub mod semantic;
pub mod taxonomic;
pub mod temporal;

pub use attribute::AttributeScorer;
pub use behavioral::BehavioralScorer;
pub use business::BusinessScorer;
pub use engine::{RankedConcept, SimilarityEngine};
pub use placeholder::PlaceholderScorer;
pub use semantic::SemanticScorer;
pub use taxonomic::TaxonomicScorer;
pub use temporal::TemporalScorer;

use crate::knowledge_base::KnowledgeBase;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Maximum evidence strings carried by a result
pub const MAX_EVIDENCE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Semantic,
    Taxonomic,
    Attribute,
    Behavioral,
    Temporal,
    Business,
    Content,
    External,
    Statistical,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Dimension::Semantic,
        Dimension::Taxonomic,
        Dimension::Attribute,
        Dimension::Behavioral,
        Dimension::Temporal,
        Dimension::Business,
        Dimension::Content,
        Dimension::External,
        Dimension::Statistical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Semantic => "semantic",
            Dimension::Taxonomic => "taxonomic",
            Dimension::Attribute => "attribute",
            Dimension::Behavioral => "behavioral",
            Dimension::Temporal => "temporal",
            Dimension::Business => "business",
            Dimension::Content => "content",
            Dimension::External => "external",
            Dimension::Statistical => "statistical",
        }
    }

    /// Weight in the "all" aggregate
    pub fn weight(&self) -> f64 {
        match self {
            Dimension::Semantic => 1.2,
            Dimension::Taxonomic => 1.1,
            Dimension::Attribute => 1.0,
            Dimension::Behavioral => 1.3,
            Dimension::Temporal => 0.8,
            Dimension::Business => 1.0,
            Dimension::Content => 0.7,
            Dimension::External => 0.6,
            Dimension::Statistical => 0.5,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Unknown dimension: {}", s))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// `High` above `high`, `Medium` above `medium`, else `Low`
    pub fn from_thresholds(score: f64, high: f64, medium: f64) -> Self {
        if score > high {
            Confidence::High
        } else if score > medium {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(s)
    }
}

/// Score of one dimension for one ordered pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    /// 0.0 - 1.0, rounded to 2 decimals
    pub score: f64,
    pub confidence: Confidence,
    /// At most `MAX_EVIDENCE` entries
    pub evidence: Vec<String>,
}

impl DimensionResult {
    pub fn new(score: f64, confidence: Confidence, mut evidence: Vec<String>) -> Self {
        evidence.truncate(MAX_EVIDENCE);
        Self {
            score: round2(score.clamp(0.0, 1.0)),
            confidence,
            evidence,
        }
    }

    /// Degraded result when a concept has no entry in the backing table
    pub fn missing(dimension: Dimension) -> Self {
        Self {
            score: 0.0,
            confidence: Confidence::Low,
            evidence: vec![format!("Missing {} data", dimension)],
        }
    }

    pub fn unknown_dimension() -> Self {
        Self {
            score: 0.0,
            confidence: Confidence::Low,
            evidence: vec!["Unknown dimension".to_string()],
        }
    }
}

/// Result of a `similarity` call; `dimensions` is set only for "all"
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub score: f64,
    pub confidence: Confidence,
    pub evidence: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BTreeMap<Dimension, DimensionResult>>,
}

impl From<DimensionResult> for SimilarityResult {
    fn from(result: DimensionResult) -> Self {
        Self {
            score: result.score,
            confidence: result.confidence,
            evidence: result.evidence,
            dimensions: None,
        }
    }
}

/// One similarity strategy
pub trait DimensionScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    /// Score the ordered pair `(a, b)`. Both IDs are raw and normalized here.
    fn score(&self, kb: &KnowledgeBase, a: &str, b: &str) -> DimensionResult;
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// |A ∩ B| / |A ∪ B|, 0 when both sets are empty
pub(crate) fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let set_a: HashSet<&T> = a.iter().collect();
    let set_b: HashSet<&T> = b.iter().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

/// Elements of `a` also present in `b`, in `a`'s order, without repeats
pub(crate) fn shared_in_order<'a>(a: &'a [String], b: &[String]) -> Vec<&'a String> {
    let set_b: HashSet<&String> = b.iter().collect();
    a.iter().filter(|x| set_b.contains(x)).unique().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse() {
        assert_eq!("semantic".parse::<Dimension>(), Ok(Dimension::Semantic));
        assert!("bogus".parse::<Dimension>().is_err());
        let total: f64 = Dimension::ALL.iter().map(|d| d.weight()).sum();
        assert!((total - 8.2).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_edges() {
        let empty: Vec<String> = vec![];
        assert_eq!(jaccard(&empty, &empty), 0.0);
        let a = vec!["x", "y"];
        let b = vec!["y", "z"];
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_result_rounding_and_truncation() {
        let r = DimensionResult::new(
            0.5667,
            Confidence::Medium,
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
        );
        assert_eq!(r.score, 0.57);
        assert_eq!(r.evidence.len(), 3);
        assert_eq!(
            DimensionResult::missing(Dimension::Temporal).evidence,
            vec!["Missing temporal data"]
        );
    }
}
