use super::{Confidence, Dimension, DimensionResult, DimensionScorer};
use crate::knowledge_base::KnowledgeBase;
use tracing::debug;

/// Co-view and co-booking rates from the first concept's profile, plus how
/// close the two session-duration impacts are.
#[derive(Clone, Debug, Default)]
pub struct BehavioralScorer;

impl DimensionScorer for BehavioralScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Behavioral
    }

    fn score(&self, kb: &KnowledgeBase, a: &str, b: &str) -> DimensionResult {
        let (profile_a, profile_b) = match (kb.behavioral(a), kb.behavioral(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                debug!("Missing behavioral data for pair ({}, {})", a, b);
                return DimensionResult::missing(self.dimension());
            }
        };
        let id_b = kb.normalize(b);

        let co_view = profile_a.co_viewed_with.get(&id_b).copied().unwrap_or(0.0);
        let co_book = profile_a.co_booked_with.get(&id_b).copied().unwrap_or(0.0);

        let impact_a = profile_a.session_duration_impact;
        let impact_b = profile_b.session_duration_impact;
        let max_impact = impact_a.max(impact_b);
        let session_similarity = if max_impact > 0.0 {
            1.0 - (impact_a - impact_b).abs() / max_impact
        } else {
            0.0
        };

        let score = co_view * 0.4 + co_book * 0.4 + session_similarity * 0.2;

        let mut evidence = Vec::new();
        if co_view > 0.0 {
            evidence.push(format!("{}% co-view rate", (co_view * 100.0).round()));
        }
        if co_book > 0.0 {
            evidence.push(format!("{}% co-booking rate", (co_book * 100.0).round()));
        }
        evidence.push(format!(
            "Session impact similarity: {}%",
            (session_similarity * 100.0).round()
        ));

        DimensionResult::new(score, Confidence::from_thresholds(score, 0.25, 0.1), evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_bar_to_pools() {
        let kb = KnowledgeBase::builtin();
        let result = BehavioralScorer.score(&kb, "pool-bar", "swimming-pool");
        assert_eq!(result.score, 0.35);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(
            result.evidence,
            vec![
                "34% co-view rate",
                "18% co-booking rate",
                "Session impact similarity: 71%"
            ]
        );
    }

    #[test]
    fn test_missing_profile() {
        let kb = KnowledgeBase::builtin();
        let result = BehavioralScorer.score(&kb, "wellness", "spa");
        assert_eq!(result, DimensionResult::missing(Dimension::Behavioral));
    }

    #[test]
    fn test_self_pair_has_no_rates() {
        let kb = KnowledgeBase::builtin();
        let result = BehavioralScorer.score(&kb, "heated-pool", "heated-pool");
        assert_eq!(result.score, 0.2);
        assert_eq!(result.evidence, vec!["Session impact similarity: 100%"]);
    }
}
