//! Role assignment for ranked concepts
//!
//! Turns a similarity ranking into a primary / secondary / tertiary hierarchy
//! with percent weights. Pure policy: the similarity engine never calls it.

use crate::similarity::RankedConcept;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds for any single role weight, in percent
pub const MIN_ROLE_WEIGHT: f64 = 5.0;
pub const MAX_ROLE_WEIGHT: f64 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Secondary,
    Tertiary,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
            Role::Tertiary => "tertiary",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptRole {
    pub concept_id: String,
    /// Percent, within `MIN_ROLE_WEIGHT..=MAX_ROLE_WEIGHT`
    pub weight: f64,
    pub role: Role,
    /// Similarity to the primary (1.0 for the primary itself)
    pub score: f64,
}

/// Percent budget per role; tertiaries split theirs evenly
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleWeights {
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            primary: 50.0,
            secondary: 30.0,
            tertiary: 20.0,
        }
    }
}

fn clamp_weight(weight: f64) -> f64 {
    weight.clamp(MIN_ROLE_WEIGHT, MAX_ROLE_WEIGHT)
}

/// Assign roles with the default 50 / 30 / 20 budget
pub fn assign_roles(primary: &str, ranked: &[RankedConcept], top_n: usize) -> Vec<ConceptRole> {
    assign_roles_with(primary, ranked, top_n, RoleWeights::default())
}

/// Sort by score (stable, descending), keep `top_n`; the best becomes
/// secondary and the rest tertiary.
pub fn assign_roles_with(
    primary: &str,
    ranked: &[RankedConcept],
    top_n: usize,
    weights: RoleWeights,
) -> Vec<ConceptRole> {
    let mut sorted: Vec<&RankedConcept> = ranked.iter().collect();
    sorted.sort_by(|a, b| {
        b.similarity
            .score
            .partial_cmp(&a.similarity.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);

    let mut roles = Vec::with_capacity(sorted.len() + 1);
    roles.push(ConceptRole {
        concept_id: primary.to_string(),
        weight: clamp_weight(weights.primary),
        role: Role::Primary,
        score: 1.0,
    });

    let tertiary_count = sorted.len().saturating_sub(1).max(1) as f64;
    for (i, candidate) in sorted.into_iter().enumerate() {
        let (role, weight) = if i == 0 {
            (Role::Secondary, weights.secondary)
        } else {
            (Role::Tertiary, weights.tertiary / tertiary_count)
        };
        roles.push(ConceptRole {
            concept_id: candidate.concept_id.clone(),
            weight: clamp_weight(weight),
            role,
            score: candidate.similarity.score,
        });
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::{Confidence, SimilarityResult};

    fn ranked(id: &str, score: f64) -> RankedConcept {
        RankedConcept {
            concept_id: id.to_string(),
            similarity: SimilarityResult {
                score,
                confidence: Confidence::Medium,
                evidence: vec![],
                dimensions: None,
            },
        }
    }

    #[test]
    fn test_roles_follow_score_order() {
        let input = vec![ranked("a", 0.3), ranked("b", 0.9), ranked("c", 0.5), ranked("d", 0.1)];
        let roles = assign_roles("wellness", &input, 3);

        let ids: Vec<&str> = roles.iter().map(|r| r.concept_id.as_str()).collect();
        assert_eq!(ids, vec!["wellness", "b", "c", "a"]);
        assert_eq!(roles[0].role, Role::Primary);
        assert_eq!(roles[0].weight, 50.0);
        assert_eq!(roles[1].role, Role::Secondary);
        assert_eq!(roles[1].weight, 30.0);
        assert_eq!(roles[2].role, Role::Tertiary);
        assert_eq!(roles[2].weight, 10.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![ranked("x", 0.5), ranked("y", 0.5), ranked("z", 0.5)];
        let roles = assign_roles("p", &input, 10);
        let ids: Vec<&str> = roles.iter().skip(1).map(|r| r.concept_id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_weights_are_clamped() {
        let input: Vec<RankedConcept> = (0..9).map(|i| ranked(&format!("c{}", i), 0.5)).collect();
        let roles = assign_roles_with(
            "p",
            &input,
            9,
            RoleWeights {
                primary: 95.0,
                secondary: 30.0,
                tertiary: 20.0,
            },
        );
        assert_eq!(roles[0].weight, MAX_ROLE_WEIGHT);
        // 20 split over 8 tertiaries is below the floor
        assert!(roles.iter().skip(2).all(|r| r.weight == MIN_ROLE_WEIGHT));
        assert!(assign_roles("p", &[], 3).len() == 1);
    }
}
