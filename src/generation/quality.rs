//! Content quality scoring
//!
//! Heuristic scores on a 0-100 scale for each generated variant, and the
//! summary across variants.

use crate::config::LengthRange;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    static ref SENTENCE_SPLIT: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref VOWEL_GROUP: Regex = Regex::new(r"[aeiouAEIOU]+").unwrap();
}

/// Ceiling for overall and baseline scores
pub const MAX_OVERALL: u32 = 95;

/// Points removed per banned word
pub const BANNED_WORD_PENALTY: u32 = 15;

/// Evidence pieces needed for full coverage
const FULL_COVERAGE_EVIDENCE: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantQuality {
    pub overall: u32,
    pub readability: u32,
    pub evidence_coverage: u32,
    pub keyword_density: u32,
    pub length_fit: u32,
    pub compliance_score: u32,
}

/// Flesch Reading Ease from whitespace words, `[.!?]` sentences and vowel
/// groups, clamped to 0..=100. 75 when there are no words or no sentences.
pub fn readability_score(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    let sentences = SENTENCE_SPLIT
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();
    if words == 0 || sentences == 0 {
        return 75.0;
    }
    let syllables = VOWEL_GROUP.find_iter(text).count();

    let words_per_sentence = words as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words as f64;
    let flesch = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    flesch.clamp(0.0, 100.0)
}

/// Share of the most repeated word longer than 3 characters, in percent
pub fn keyword_density(text: &str) -> f64 {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect();
    if words.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in words.iter().filter(|w| w.chars().count() > 3) {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }
    let max_repeats = counts.values().copied().max().unwrap_or(0);
    max_repeats as f64 / words.len() as f64 * 100.0
}

/// 90-100 inside the 1-3% band (100 at 2%), lower outside it
pub fn keyword_density_score(text: &str) -> f64 {
    let density = keyword_density(text);
    if (1.0..=3.0).contains(&density) {
        90.0 + 10.0 * (1.0 - (density - 2.0).abs())
    } else if density < 1.0 {
        70.0 + 20.0 * density
    } else {
        (90.0 - 10.0 * (density - 3.0)).max(50.0)
    }
}

/// 90-100 inside the range (100 at the midpoint), else falls with the
/// relative deviation down to 50. 90 without a configured range.
pub fn length_fit_score(text: &str, range: Option<LengthRange>) -> f64 {
    let range = match range {
        Some(r) => r,
        None => return 90.0,
    };
    let length = text.chars().count() as f64;
    let (min, max) = (range.min as f64, range.max as f64);

    if length >= min && length <= max {
        let mid = (min + max) / 2.0;
        let half = (max - min) / 2.0;
        if half == 0.0 {
            return 100.0;
        }
        return 100.0 - 10.0 * (length - mid).abs() / half;
    }

    let deviation = if length < min {
        if min > 0.0 {
            (min - length) / min
        } else {
            0.0
        }
    } else if max > 0.0 {
        (length - max) / max
    } else {
        1.0
    };
    (90.0 - 40.0 * deviation).max(50.0)
}

/// Banned words found anywhere in the text, case-insensitive
pub fn banned_word_hits(text: &str, banned_words: &[String]) -> usize {
    let lower = text.to_lowercase();
    banned_words
        .iter()
        .filter(|w| !w.is_empty() && lower.contains(&w.to_lowercase()))
        .count()
}

/// 100, minus 15 per banned word, 20 when under 10 characters and 10 without
/// terminal punctuation. Floored at 60.
pub fn compliance_score(text: &str, banned_words: &[String]) -> f64 {
    let mut score = 100.0 - (BANNED_WORD_PENALTY as usize * banned_word_hits(text, banned_words)) as f64;
    if text.chars().count() < 10 {
        score -= 20.0;
    }
    if !text.trim_end().ends_with(['.', '!', '?']) {
        score -= 10.0;
    }
    score.max(60.0)
}

/// Coverage fraction from the number of evidence pieces
pub fn evidence_coverage(evidence_count: usize) -> f64 {
    (evidence_count as f64 / FULL_COVERAGE_EVIDENCE as f64).min(1.0)
}

/// Overall is the capped weighted score minus the banned-word penalty,
/// floored at 0
pub fn score_variant(
    text: &str,
    evidence_count: usize,
    range: Option<LengthRange>,
    banned_words: &[String],
) -> VariantQuality {
    let readability = readability_score(text);
    let coverage = evidence_coverage(evidence_count);
    let length_fit = length_fit_score(text, range);
    let density = keyword_density_score(text);
    let compliance = compliance_score(text, banned_words);

    let weighted = 0.4 * readability + 0.3 * (coverage * 100.0) + 0.2 * length_fit + 0.1 * density;
    let capped = (weighted.round() as u32).min(MAX_OVERALL);
    let penalty = BANNED_WORD_PENALTY * banned_word_hits(text, banned_words) as u32;

    VariantQuality {
        overall: capped.saturating_sub(penalty),
        readability: readability.round() as u32,
        evidence_coverage: (coverage * 100.0).round() as u32,
        keyword_density: density.round() as u32,
        length_fit: length_fit.round() as u32,
        compliance_score: compliance.round() as u32,
    }
}

/// Expected quality before generation, from role weight fractions and the
/// number of selected context insights
pub fn baseline_estimate(primary: f64, secondary: f64, tertiary: f64, insights: usize) -> u32 {
    let insight_bonus = (insights as f64 * 1.5).min(10.0);
    let estimate = 75.0 + primary * 15.0 + secondary * 8.0 + tertiary * 2.0 + insight_bonus;
    (estimate.round() as u32).min(MAX_OVERALL)
}

/// Summary across all variants of one generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityAnalysis {
    pub overall_score: u32,
    pub average_readability: u32,
    pub evidence_integration: u32,
    /// Percent of hierarchy concepts mentioned by at least one variant
    pub concept_coverage: u32,
    pub baseline_estimate: u32,
}

impl QualityAnalysis {
    pub fn summarize<'a, I>(qualities: &[VariantQuality], texts: I, concept_names: &[&str], baseline: u32) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mean = |f: fn(&VariantQuality) -> u32| -> u32 {
            if qualities.is_empty() {
                return 0;
            }
            let sum: u32 = qualities.iter().map(f).sum();
            (sum as f64 / qualities.len() as f64).round() as u32
        };

        let joined = texts
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let concept_coverage = if concept_names.is_empty() {
            0
        } else {
            let mentioned = concept_names
                .iter()
                .filter(|n| joined.contains(&n.to_lowercase()))
                .count();
            (mentioned as f64 / concept_names.len() as f64 * 100.0).round() as u32
        };

        Self {
            overall_score: mean(|q| q.overall),
            average_readability: mean(|q| q.readability),
            evidence_integration: mean(|q| q.evidence_coverage),
            concept_coverage,
            baseline_estimate: baseline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banned() -> Vec<String> {
        ["amazing", "incredible", "unbelievable", "perfect", "ultimate"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    #[test]
    fn test_readability_edges() {
        assert_eq!(readability_score(""), 75.0);
        assert_eq!(readability_score("..."), 75.0);
        let simple = readability_score("The cat sat. The dog ran.");
        assert!(simple > 90.0 && simple <= 100.0);
    }

    #[test]
    fn test_keyword_density_bands() {
        // "wellness" is 1 of 50 words = 2%
        let mut words = vec!["wellness".to_string()];
        words.extend((0..49).map(|_| "a".to_string()));
        let text = words.join(" ");
        assert!((keyword_density(&text) - 2.0).abs() < 1e-9);
        assert!((keyword_density_score(&text) - 100.0).abs() < 1e-9);

        // Every word repeated: 100% density
        assert_eq!(keyword_density_score("pool pool pool pool"), 50.0);
        // No word longer than 3 chars
        assert_eq!(keyword_density_score("a spa is fun"), 70.0);
    }

    #[test]
    fn test_length_fit() {
        let range = Some(LengthRange { min: 10, max: 30 });
        assert_eq!(length_fit_score(&"x".repeat(20), range), 100.0);
        assert_eq!(length_fit_score(&"x".repeat(10), range), 90.0);
        assert_eq!(length_fit_score(&"x".repeat(5), range), 70.0);
        assert_eq!(length_fit_score(&"x".repeat(300), range), 50.0);
        assert_eq!(length_fit_score("anything", None), 90.0);
    }

    #[test]
    fn test_compliance() {
        assert_eq!(compliance_score("A calm, quiet spa retreat.", &banned()), 100.0);
        assert_eq!(compliance_score("An amazing spa retreat.", &banned()), 85.0);
        assert_eq!(compliance_score("Calm spa", &banned()), 70.0);
        assert_eq!(
            compliance_score("amazing incredible perfect ultimate", &banned()),
            60.0
        );
    }

    #[test]
    fn test_banned_word_lowers_overall() {
        let clean = "Relax in our calm wellness spa with heated pools and quiet garden views for every guest.";
        let dirty = "Relax in our amazing wellness spa with heated pools and quiet garden views for every guest.";
        let range = Some(LengthRange { min: 50, max: 160 });
        let a = score_variant(clean, 3, range, &banned());
        let b = score_variant(dirty, 3, range, &banned());
        assert!(a.overall <= MAX_OVERALL);
        assert!(b.overall < a.overall);
    }

    #[test]
    fn test_banned_word_penalty_floors_at_zero() {
        let overall = |text: &str| score_variant(text, 3, None, &banned()).overall;
        assert_eq!(overall("Amazing spa."), 40);
        assert_eq!(overall("Amazing incredible spa."), 11);
        assert_eq!(overall("Amazing incredible perfect spa."), 0);
        assert_eq!(
            overall("Amazing incredible perfect unbelievable ultimate spa retreat."),
            0
        );
    }

    #[test]
    fn test_baseline_estimate() {
        assert_eq!(baseline_estimate(0.5, 0.3, 0.2, 0), 85);
        assert_eq!(baseline_estimate(1.0, 1.0, 1.0, 10), MAX_OVERALL);
    }

    #[test]
    fn test_summary() {
        let q = |overall| VariantQuality {
            overall,
            readability: 60,
            evidence_coverage: 40,
            keyword_density: 90,
            length_fit: 95,
            compliance_score: 100,
        };
        let summary = QualityAnalysis::summarize(
            &[q(80), q(70), q(75)],
            ["Our wellness spa", "Spa days", "Calm rooms"],
            &["Wellness", "Spa", "Pools"],
            85,
        );
        assert_eq!(summary.overall_score, 75);
        assert_eq!(summary.concept_coverage, 67);
        assert_eq!(summary.baseline_estimate, 85);
    }
}
