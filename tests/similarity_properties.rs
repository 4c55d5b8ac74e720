//! Properties of the similarity engine over the built-in knowledge base

use concept_affinity::similarity::engine::ALL_DIMENSIONS;
use concept_affinity::{assign_roles, Confidence, Dimension, KnowledgeBase, Role, SimilarityEngine};
use std::sync::Arc;

fn engine() -> SimilarityEngine {
    SimilarityEngine::new(Arc::new(KnowledgeBase::builtin()))
}

#[test]
fn test_scores_bounded_and_idempotent() {
    let engine = engine();
    let ids = engine.knowledge_base().concept_ids();

    for a in ids.iter().take(12) {
        for b in ids.iter().rev().take(12) {
            for dim in Dimension::ALL {
                let first = engine.score(dim, a, b);
                let second = engine.score(dim, a, b);
                assert!(
                    (0.0..=1.0).contains(&first.score),
                    "{} {} {} out of range: {}",
                    dim,
                    a,
                    b,
                    first.score
                );
                assert!(first.evidence.len() <= 3);
                assert_eq!(first, second);
            }
        }
    }
}

#[test]
fn test_taxonomic_is_asymmetric() {
    let engine = engine();
    let forward = engine.similarity("luxury", "spa", "taxonomic");
    let backward = engine.similarity("spa", "luxury", "taxonomic");
    assert_eq!(forward.score, 0.6);
    assert_eq!(backward.score, 0.0);
}

#[test]
fn test_all_is_weighted_mean() {
    let engine = engine();
    let result = engine.similarity("wellness", "spa", ALL_DIMENSIONS);
    let dimensions = result.dimensions.expect("aggregate carries per-dimension results");
    assert_eq!(dimensions.len(), 9);

    let total: f64 = Dimension::ALL.iter().map(|d| d.weight()).sum();
    let expected: f64 = dimensions
        .iter()
        .map(|(dim, r)| r.score * dim.weight())
        .sum::<f64>()
        / total;
    assert!((result.score - expected).abs() <= 0.005 + 1e-9);
}

#[test]
fn test_batch_preserves_order() {
    let engine = engine();
    let candidates = ["ski", "spa", "pools", "nonexistent-concept"];
    let ranked = engine.batch_similarity("wellness", &candidates, "semantic");

    let ids: Vec<&str> = ranked.iter().map(|r| r.concept_id.as_str()).collect();
    assert_eq!(ids, candidates);
}

#[test]
fn test_missing_concept_degrades() {
    let engine = engine();
    let result = engine.score(Dimension::Semantic, "nonexistent-concept", "wellness");
    assert_eq!(result.score, 0.0);
    assert_eq!(result.confidence, Confidence::Low);

    let unknown = engine.similarity("wellness", "spa", "vibes");
    assert_eq!(unknown.score, 0.0);
    assert_eq!(unknown.evidence, vec!["Unknown dimension"]);
}

#[test]
fn test_aliases_resolve_to_same_scores() {
    let engine = engine();
    let via_alias = engine.similarity("def_wellness", "spa-services", "semantic");
    let canonical = engine.similarity("wellness", "spa", "semantic");
    assert_eq!(via_alias, canonical);
}

#[test]
fn test_rank_then_assign_roles() {
    let engine = engine();
    let candidates = ["spa", "ski", "pools", "luxury"];
    let ranked = engine.batch_similarity("wellness", &candidates, ALL_DIMENSIONS);
    let roles = assign_roles("wellness", &ranked, 3);

    assert_eq!(roles[0].concept_id, "wellness");
    assert_eq!(roles[0].role, Role::Primary);
    assert_eq!(roles.len(), 4);
    assert_eq!(roles[1].role, Role::Secondary);
    assert!(roles[1].score >= roles[2].score);
    assert!(roles.iter().all(|r| (5.0..=80.0).contains(&r.weight)));
}
