use super::{jaccard, shared_in_order, Confidence, Dimension, DimensionResult, DimensionScorer};
use crate::knowledge_base::KnowledgeBase;
use tracing::debug;

/// Window for booking lead-time similarity, in days
const LEAD_TIME_WINDOW_DAYS: f64 = 60.0;

/// Mean of (1 - |difference|) over paired curve points
fn curve_correlation(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| 1.0 - (x - y).abs()).sum::<f64>() / a.len() as f64
}

#[derive(Clone, Debug, Default)]
pub struct TemporalScorer;

impl DimensionScorer for TemporalScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Temporal
    }

    fn score(&self, kb: &KnowledgeBase, a: &str, b: &str) -> DimensionResult {
        let (profile_a, profile_b) = match (kb.temporal(a), kb.temporal(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                debug!("Missing temporal data for pair ({}, {})", a, b);
                return DimensionResult::missing(self.dimension());
            }
        };

        let seasonal = curve_correlation(
            &profile_a.seasonal_demand.values(),
            &profile_b.seasonal_demand.values(),
        );
        let daily = curve_correlation(&profile_a.daily_usage.values(), &profile_b.daily_usage.values());
        let lead_diff = (profile_a.booking_lead_time - profile_b.booking_lead_time).abs();
        let lead_time = (1.0 - lead_diff / LEAD_TIME_WINDOW_DAYS).max(0.0);
        let peaks = jaccard(&profile_a.peak_months, &profile_b.peak_months);

        let score = seasonal * 0.3 + daily * 0.2 + lead_time * 0.2 + peaks * 0.3;

        let mut evidence = vec![
            format!("Seasonal correlation: {}%", (seasonal * 100.0).round()),
            format!("Daily usage correlation: {}%", (daily * 100.0).round()),
        ];
        let shared = shared_in_order(&profile_a.peak_months, &profile_b.peak_months);
        if !shared.is_empty() {
            let months: Vec<&str> = shared.iter().map(|m| m.as_str()).collect();
            evidence.push(format!("Shared peak months: {}", months.join(", ")));
        }

        DimensionResult::new(score, Confidence::from_thresholds(score, 0.7, 0.4), evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_and_pool_bar() {
        let kb = KnowledgeBase::builtin();
        let result = TemporalScorer.score(&kb, "pools", "pool-bar");
        assert_eq!(result.score, 0.8);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(
            result.evidence,
            vec![
                "Seasonal correlation: 93%",
                "Daily usage correlation: 88%",
                "Shared peak months: june, july, august"
            ]
        );
    }

    #[test]
    fn test_disjoint_peaks_drop_evidence() {
        let kb = KnowledgeBase::builtin();
        let result = TemporalScorer.score(&kb, "pools", "heated-pool");
        assert_eq!(result.evidence.len(), 2);
        assert!(result.score < 0.7);
    }
}
