//! Similarity Engine - Single-dimension lookup, weighted aggregate, batch ranking

use super::{
    round2, AttributeScorer, BehavioralScorer, BusinessScorer, Confidence, Dimension,
    DimensionResult, DimensionScorer, PlaceholderScorer, SemanticScorer, SimilarityResult,
    TaxonomicScorer, TemporalScorer,
};
use crate::knowledge_base::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Dimension name that selects the weighted aggregate
pub const ALL_DIMENSIONS: &str = "all";

/// High-confidence dimension counts for aggregate confidence
const AGGREGATE_HIGH_MIN: usize = 5;
const AGGREGATE_MEDIUM_MIN: usize = 3;

/// One candidate from `batch_similarity`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedConcept {
    pub concept_id: String,
    pub similarity: SimilarityResult,
}

/// Pure scoring over an immutable knowledge base
#[derive(Clone)]
pub struct SimilarityEngine {
    kb: Arc<KnowledgeBase>,
    scorers: BTreeMap<Dimension, Arc<dyn DimensionScorer>>,
}

impl SimilarityEngine {
    /// Engine with the nine default scorers, placeholders seeded with 0
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self::with_seed(kb, 0)
    }

    pub fn with_seed(kb: Arc<KnowledgeBase>, seed: u64) -> Self {
        let defaults: Vec<Arc<dyn DimensionScorer>> = vec![
            Arc::new(SemanticScorer),
            Arc::new(TaxonomicScorer),
            Arc::new(AttributeScorer),
            Arc::new(BehavioralScorer),
            Arc::new(TemporalScorer),
            Arc::new(BusinessScorer),
            Arc::new(PlaceholderScorer::new(Dimension::Content, seed)),
            Arc::new(PlaceholderScorer::new(Dimension::External, seed)),
            Arc::new(PlaceholderScorer::new(Dimension::Statistical, seed)),
        ];
        let scorers = defaults.into_iter().map(|s| (s.dimension(), s)).collect();
        Self { kb, scorers }
    }

    /// Replace the scorer for `scorer.dimension()`
    pub fn with_scorer<S: DimensionScorer + 'static>(mut self, scorer: S) -> Self {
        self.scorers.insert(scorer.dimension(), Arc::new(scorer));
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn score(&self, dimension: Dimension, a: &str, b: &str) -> DimensionResult {
        match self.scorers.get(&dimension) {
            Some(scorer) => scorer.score(&self.kb, a, b),
            None => DimensionResult::unknown_dimension(),
        }
    }

    /// Similarity of `other` to `primary` on `dimension`, or the weighted
    /// aggregate for `"all"`. Unknown names yield a zero, low-confidence result.
    pub fn similarity(&self, primary: &str, other: &str, dimension: &str) -> SimilarityResult {
        if dimension == ALL_DIMENSIONS {
            return self.aggregate(primary, other);
        }
        match dimension.parse::<Dimension>() {
            Ok(dim) => self.score(dim, primary, other).into(),
            Err(_) => {
                debug!("Unknown similarity dimension '{}'", dimension);
                DimensionResult::unknown_dimension().into()
            }
        }
    }

    /// Weighted mean of all nine dimensions
    pub fn aggregate(&self, primary: &str, other: &str) -> SimilarityResult {
        let dimensions: BTreeMap<Dimension, DimensionResult> = Dimension::ALL
            .iter()
            .map(|d| (*d, self.score(*d, primary, other)))
            .collect();

        let (weighted, total_weight) = dimensions
            .iter()
            .fold((0.0, 0.0), |(sum, weight), (dim, result)| {
                (sum + result.score * dim.weight(), weight + dim.weight())
            });
        let score = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };

        let high_count = dimensions
            .values()
            .filter(|r| r.confidence == Confidence::High)
            .count();
        let confidence = if high_count >= AGGREGATE_HIGH_MIN {
            Confidence::High
        } else if high_count >= AGGREGATE_MEDIUM_MIN {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        SimilarityResult {
            score: round2(score),
            confidence,
            evidence: vec![
                "Multi-dimensional analysis".to_string(),
                format!("{}/{} high-confidence dimensions", high_count, Dimension::ALL.len()),
                "Weighted average calculation".to_string(),
            ],
            dimensions: Some(dimensions),
        }
    }

    /// One entry per candidate, in input order
    pub fn batch_similarity<S: AsRef<str>>(
        &self,
        primary: &str,
        candidates: &[S],
        dimension: &str,
    ) -> Vec<RankedConcept> {
        candidates
            .iter()
            .map(|candidate| RankedConcept {
                concept_id: candidate.as_ref().to_string(),
                similarity: self.similarity(primary, candidate.as_ref(), dimension),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SimilarityEngine {
        SimilarityEngine::new(Arc::new(KnowledgeBase::builtin()))
    }

    #[test]
    fn test_named_dimension_delegates() {
        let engine = engine();
        let result = engine.similarity("wellness", "spa", "semantic");
        assert_eq!(result.score, 0.57);
        assert!(result.dimensions.is_none());
    }

    #[test]
    fn test_unknown_dimension() {
        let result = engine().similarity("wellness", "spa", "astrological");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.evidence, vec!["Unknown dimension"]);
    }

    #[test]
    fn test_aggregate_is_weighted_mean() {
        let engine = engine();
        let result = engine.similarity("pool-bar", "pools", ALL_DIMENSIONS);
        let dims = result.dimensions.as_ref().unwrap();
        assert_eq!(dims.len(), 9);

        let expected: f64 = dims.iter().map(|(d, r)| r.score * d.weight()).sum::<f64>() / 8.2;
        assert!((result.score - expected).abs() <= 0.005 + 1e-9);
        assert_eq!(result.evidence[0], "Multi-dimensional analysis");
    }

    #[test]
    fn test_with_scorer_swaps_placeholder() {
        let engine = engine()
            .with_scorer(PlaceholderScorer::fixed(Dimension::Content, 0.42));
        assert_eq!(engine.score(Dimension::Content, "spa", "pools").score, 0.42);
    }

    #[test]
    fn test_batch_preserves_order() {
        let candidates = vec!["spa", "nonexistent-concept", "luxury", "pools"];
        let ranked = engine().batch_similarity("wellness", &candidates, "semantic");
        let ids: Vec<&str> = ranked.iter().map(|r| r.concept_id.as_str()).collect();
        assert_eq!(ids, candidates);
        assert_eq!(ranked[1].similarity.score, 0.0);
    }
}
