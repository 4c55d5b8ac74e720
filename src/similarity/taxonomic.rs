use super::{Confidence, Dimension, DimensionResult, DimensionScorer};
use crate::knowledge_base::KnowledgeBase;
use tracing::debug;

/// Hierarchy relationships, additive and capped at 1.0.
///
/// The parent and shared-parent rules look at both concepts, and a link counts
/// whether it is declared on the child's `parents` or the parent's `children`.
/// The sibling and related-service/amenity rules only read the first concept's
/// lists, so the score of `(a, b)` can differ from `(b, a)`.
#[derive(Clone, Debug, Default)]
pub struct TaxonomicScorer;

impl DimensionScorer for TaxonomicScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Taxonomic
    }

    fn score(&self, kb: &KnowledgeBase, a: &str, b: &str) -> DimensionResult {
        let (entry_a, entry_b) = match (kb.taxonomy(a), kb.taxonomy(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                debug!("Missing taxonomic data for pair ({}, {})", a, b);
                return DimensionResult::missing(self.dimension());
            }
        };
        let id_a = kb.normalize(a);
        let id_b = kb.normalize(b);

        let mut score = 0.0;
        let mut evidence = Vec::new();

        let parent_child = entry_a.parents.contains(&id_b)
            || entry_b.parents.contains(&id_a)
            || entry_a.children.contains(&id_b)
            || entry_b.children.contains(&id_a);
        if parent_child {
            score += 0.8;
            evidence.push("Direct parent-child relationship".to_string());
        }

        if entry_a.siblings.contains(&id_b) {
            score += 0.6;
            evidence.push("Sibling relationship in taxonomy".to_string());
        }

        if let Some(parent) = entry_a.parents.iter().find(|p| entry_b.parents.contains(p)) {
            score += 0.5;
            evidence.push(format!("Shared parent: {}", parent));
        }

        if entry_a.related_services.contains(&id_b) {
            score += 0.4;
            evidence.push("Related service connection".to_string());
        }

        if entry_a.related_amenities.contains(&id_b) {
            score += 0.4;
            evidence.push("Related amenity connection".to_string());
        }

        let score: f64 = f64::min(score, 1.0);
        if evidence.is_empty() {
            evidence.push("No direct taxonomic relationship".to_string());
        }

        DimensionResult::new(score, Confidence::from_thresholds(score, 0.7, 0.4), evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::{ConceptNormalizer, TaxonomyEntry};

    #[test]
    fn test_sibling_rule_is_one_directional() {
        let kb = KnowledgeBase::builtin();
        let forward = TaxonomicScorer.score(&kb, "luxury", "spa");
        let backward = TaxonomicScorer.score(&kb, "spa", "luxury");
        assert_eq!(forward.score, 0.6);
        assert_eq!(forward.confidence, Confidence::Medium);
        assert_eq!(backward.score, 0.0);
        assert_eq!(backward.evidence, vec!["No direct taxonomic relationship"]);
    }

    #[test]
    fn test_related_amenity_through_alias() {
        let kb = KnowledgeBase::builtin();
        // pool-bar lists "swimming-pool" as a related amenity and pools lists
        // pool-bar as a child; both resolve through the alias
        let forward = TaxonomicScorer.score(&kb, "pool-bar", "pools");
        assert_eq!(forward.score, 1.0);
        assert_eq!(
            forward.evidence,
            vec!["Direct parent-child relationship", "Related amenity connection"]
        );
        assert_eq!(TaxonomicScorer.score(&kb, "pools", "pool-bar").score, 0.8);
    }

    fn two_entry_kb(first: (&str, TaxonomyEntry), second: (&str, TaxonomyEntry)) -> KnowledgeBase {
        KnowledgeBase::builder(ConceptNormalizer::new())
            .taxonomy(first.0, first.1)
            .taxonomy(second.0, second.1)
            .build()
    }

    #[test]
    fn test_link_declared_only_as_child() {
        let kb = two_entry_kb(
            (
                "pools",
                TaxonomyEntry {
                    children: vec!["lap-pool".to_string()],
                    ..Default::default()
                },
            ),
            ("lap-pool", TaxonomyEntry::default()),
        );
        for (a, b) in [("lap-pool", "pools"), ("pools", "lap-pool")] {
            let result = TaxonomicScorer.score(&kb, a, b);
            assert_eq!(result.score, 0.8);
            assert_eq!(result.evidence, vec!["Direct parent-child relationship"]);
        }
    }

    #[test]
    fn test_related_amenity_is_one_directional() {
        let kb = two_entry_kb(
            (
                "pool-bar",
                TaxonomyEntry {
                    related_amenities: vec!["Pools".to_string()],
                    ..Default::default()
                },
            ),
            ("pools", TaxonomyEntry::default()),
        );
        let forward = TaxonomicScorer.score(&kb, "pool-bar", "pools");
        assert_eq!(forward.score, 0.4);
        assert_eq!(forward.evidence, vec!["Related amenity connection"]);
        assert_eq!(TaxonomicScorer.score(&kb, "pools", "pool-bar").score, 0.0);
    }

    #[test]
    fn test_score_is_capped() {
        let kb = KnowledgeBase::builtin();
        let result = TaxonomicScorer.score(&kb, "infinity-pool", "heated-pool");
        assert_eq!(result.score, 1.0);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.evidence.contains(&"Shared parent: pools".to_string()));
    }

    #[test]
    fn test_parent_rule() {
        let kb = KnowledgeBase::builtin();
        let result = TaxonomicScorer.score(&kb, "pools", "infinity-pool");
        assert_eq!(result.score, 0.8);
        assert_eq!(result.evidence, vec!["Direct parent-child relationship"]);
    }
}
