use super::{jaccard, shared_in_order, Confidence, Dimension, DimensionResult, DimensionScorer};
use crate::knowledge_base::KnowledgeBase;
use tracing::debug;

/// Term overlap: 0.7 × J(semantic terms) + 0.3 × J(attributes)
#[derive(Clone, Debug, Default)]
pub struct SemanticScorer;

impl DimensionScorer for SemanticScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Semantic
    }

    fn score(&self, kb: &KnowledgeBase, a: &str, b: &str) -> DimensionResult {
        let (concept_a, concept_b) = match (kb.concept(a), kb.concept(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                debug!("Missing semantic data for pair ({}, {})", a, b);
                return DimensionResult::missing(self.dimension());
            }
        };

        let term_score = jaccard(&concept_a.semantic_terms, &concept_b.semantic_terms);
        let attr_score = jaccard(&concept_a.attributes, &concept_b.attributes);
        let score = term_score * 0.7 + attr_score * 0.3;

        let mut evidence: Vec<String> =
            shared_in_order(&concept_a.semantic_terms, &concept_b.semantic_terms)
                .into_iter()
                .take(3)
                .cloned()
                .collect();
        if evidence.is_empty() {
            evidence.push("Limited semantic overlap".to_string());
        }

        DimensionResult::new(score, Confidence::from_thresholds(score, 0.7, 0.4), evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wellness_spa() {
        let kb = KnowledgeBase::builtin();
        let result = SemanticScorer.score(&kb, "wellness", "spa");
        assert_eq!(result.score, 0.57);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.evidence, vec!["wellness", "relaxation", "spa"]);
    }

    #[test]
    fn test_missing_concept() {
        let kb = KnowledgeBase::builtin();
        let result = SemanticScorer.score(&kb, "nonexistent-concept", "wellness");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.evidence, vec!["Missing semantic data"]);
    }

    #[test]
    fn test_no_overlap_evidence() {
        let kb = KnowledgeBase::builtin();
        let result = SemanticScorer.score(&kb, "ski", "budget-friendly");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.evidence, vec!["Limited semantic overlap"]);
    }
}
