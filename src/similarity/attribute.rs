use super::{jaccard, shared_in_order, Confidence, Dimension, DimensionResult, DimensionScorer};
use crate::knowledge_base::KnowledgeBase;
use tracing::debug;

/// J(attributes) plus a category bonus (0.3, or 0.5 with matching subcategory)
#[derive(Clone, Debug, Default)]
pub struct AttributeScorer;

impl DimensionScorer for AttributeScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Attribute
    }

    fn score(&self, kb: &KnowledgeBase, a: &str, b: &str) -> DimensionResult {
        let (concept_a, concept_b) = match (kb.concept(a), kb.concept(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                debug!("Missing attribute data for pair ({}, {})", a, b);
                return DimensionResult::missing(self.dimension());
            }
        };

        let overlap = jaccard(&concept_a.attributes, &concept_b.attributes);
        let same_category = concept_a.category == concept_b.category;

        let mut bonus = 0.0;
        if same_category {
            bonus += 0.3;
            if concept_a.subcategory == concept_b.subcategory {
                bonus += 0.2;
            }
        }
        let score: f64 = f64::min(overlap + bonus, 1.0);

        // Leave room for the category note
        let attr_slots = if same_category { 2 } else { 3 };
        let mut evidence: Vec<String> = shared_in_order(&concept_a.attributes, &concept_b.attributes)
            .into_iter()
            .take(attr_slots)
            .cloned()
            .collect();
        if same_category {
            evidence.push(format!("Same category: {}", concept_a.category));
        }
        if evidence.is_empty() {
            evidence.push("Limited attribute alignment".to_string());
        }

        DimensionResult::new(score, Confidence::from_thresholds(score, 0.8, 0.5), evidence)
    }
}
