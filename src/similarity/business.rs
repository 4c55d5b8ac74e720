use super::{Confidence, Dimension, DimensionResult, DimensionScorer};
use crate::knowledge_base::KnowledgeBase;
use tracing::debug;

/// Lift and revenue differences are normalized by 50 points
const IMPACT_WINDOW: f64 = 0.5;

/// Search volume differences are compared on a natural-log scale
const LOG_VOLUME_WINDOW: f64 = 5.0;

#[derive(Clone, Debug, Default)]
pub struct BusinessScorer;

impl DimensionScorer for BusinessScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Business
    }

    fn score(&self, kb: &KnowledgeBase, a: &str, b: &str) -> DimensionResult {
        let metrics = (
            kb.concept(a).and_then(|c| c.business_metrics.as_ref()),
            kb.concept(b).and_then(|c| c.business_metrics.as_ref()),
        );
        let (metrics_a, metrics_b) = match metrics {
            (Some(x), Some(y)) => (x, y),
            _ => {
                debug!("Missing business data for pair ({}, {})", a, b);
                return DimensionResult::missing(self.dimension());
            }
        };

        let lift = (1.0 - (metrics_a.avg_booking_lift - metrics_b.avg_booking_lift).abs() / IMPACT_WINDOW).max(0.0);
        let revenue = (1.0 - (metrics_a.revenue_impact - metrics_b.revenue_impact).abs() / IMPACT_WINDOW).max(0.0);
        let volume = if metrics_a.search_volume > 0.0 && metrics_b.search_volume > 0.0 {
            let diff = (metrics_a.search_volume.ln() - metrics_b.search_volume.ln()).abs();
            (1.0 - diff / LOG_VOLUME_WINDOW).max(0.0)
        } else {
            0.0
        };

        let score = lift * 0.4 + revenue * 0.4 + volume * 0.2;

        let evidence = vec![
            format!(
                "Booking lift: {}% vs {}%",
                (metrics_a.avg_booking_lift * 100.0).round(),
                (metrics_b.avg_booking_lift * 100.0).round()
            ),
            format!(
                "Revenue impact: {}% vs {}%",
                (metrics_a.revenue_impact * 100.0).round(),
                (metrics_b.revenue_impact * 100.0).round()
            ),
            format!(
                "Search volume: {} vs {}",
                group_thousands(metrics_a.search_volume),
                group_thousands(metrics_b.search_volume)
            ),
        ];

        DimensionResult::new(score, Confidence::from_thresholds(score, 0.6, 0.3), evidence)
    }
}

/// 5200.0 -> "5,200"
fn group_thousands(value: f64) -> String {
    let digits = (value.round() as i64).abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wellness_spa_metrics() {
        let kb = KnowledgeBase::builtin();
        let result = BusinessScorer.score(&kb, "wellness", "spa");
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.score > 0.9);
        assert_eq!(result.evidence[0], "Booking lift: 32% vs 35%");
        assert_eq!(result.evidence[2], "Search volume: 5,200 vs 4,200");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(950.0), "950");
        assert_eq!(group_thousands(1800.0), "1,800");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
    }

    #[test]
    fn test_missing_metrics() {
        let kb = KnowledgeBase::builtin();
        let result = BusinessScorer.score(&kb, "wellness", "sauna");
        assert_eq!(result, DimensionResult::missing(Dimension::Business));
    }
}
