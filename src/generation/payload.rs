//! Generation payload - everything a backend needs to write the variants
//!
//! Built from a validated request plus the generation config: the weighted
//! concept hierarchy, structured evidence with per-concept alignment, the
//! content spec, the token table and the output requirements.

use super::request::{ConceptRef, GenerationRequest, Surface};
use crate::config::{GenerationConfig, LengthRange};
use crate::evidence::Evidence;
use crate::similarity::Confidence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const READABILITY_TARGET: &str = "grade_8_9";
pub const KEYWORD_DENSITY_TARGET: &str = "1-3%";
pub const VARIANT_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStyle {
    Descriptive,
    Persuasive,
    Concise,
}

impl VariantStyle {
    pub const ALL: [VariantStyle; VARIANT_COUNT] = [
        VariantStyle::Descriptive,
        VariantStyle::Persuasive,
        VariantStyle::Concise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantStyle::Descriptive => "descriptive",
            VariantStyle::Persuasive => "persuasive",
            VariantStyle::Concise => "concise",
        }
    }
}

impl fmt::Display for VariantStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedConcept {
    pub concept: ConceptRef,
    /// Fraction of the total budget (0.0 - 1.0)
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptHierarchy {
    pub primary: WeightedConcept,
    pub secondary: Vec<WeightedConcept>,
    pub tertiary: Vec<WeightedConcept>,
}

impl ConceptHierarchy {
    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.primary.weight
            + self.secondary.iter().map(|c| c.weight).sum::<f64>()
            + self.tertiary.iter().map(|c| c.weight).sum::<f64>()
    }

    pub fn all_concepts(&self) -> impl Iterator<Item = &WeightedConcept> {
        std::iter::once(&self.primary)
            .chain(self.secondary.iter())
            .chain(self.tertiary.iter())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuredEvidence {
    pub text: String,
    pub source: String,
    pub confidence: Confidence,
    pub relevance_score: f64,
    /// Concept name → fraction of its terms found in the text
    pub concept_alignment: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentSpec {
    pub tone: String,
    pub surface: Surface,
    pub language: String,
    pub length_target: Option<LengthRange>,
    pub banned_words: Vec<String>,
    pub readability_target: String,
    pub keyword_density_target: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputRequirements {
    pub variant_count: usize,
    pub variant_styles: Vec<VariantStyle>,
    pub evidence_attribution: bool,
}

impl Default for OutputRequirements {
    fn default() -> Self {
        Self {
            variant_count: VARIANT_COUNT,
            variant_styles: VariantStyle::ALL.to_vec(),
            evidence_attribution: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationPayload {
    pub concept_hierarchy: ConceptHierarchy,
    pub evidence: Vec<StructuredEvidence>,
    pub content_spec: ContentSpec,
    /// Token key (without braces) → value
    pub tokens: BTreeMap<String, String>,
    pub output_requirements: OutputRequirements,
    pub context_insights: Vec<String>,
}

impl GenerationPayload {
    /// Package a request. The request must already be validated.
    pub fn build(request: &GenerationRequest, config: &GenerationConfig) -> Self {
        let primary = request
            .primary()
            .cloned()
            .unwrap_or_else(|| ConceptRef::new("", ""));

        let secondary = request.secondary();
        let tertiary = request.tertiary();
        let secondary_share = request.weights.secondary / 100.0 / secondary.len().max(1) as f64;
        let tertiary_share = request.weights.tertiary / 100.0 / tertiary.len().max(1) as f64;

        let concept_hierarchy = ConceptHierarchy {
            primary: WeightedConcept {
                concept: primary,
                weight: request.weights.primary / 100.0,
            },
            secondary: secondary
                .iter()
                .map(|c| WeightedConcept {
                    concept: c.clone(),
                    weight: secondary_share,
                })
                .collect(),
            tertiary: tertiary
                .iter()
                .map(|c| WeightedConcept {
                    concept: c.clone(),
                    weight: tertiary_share,
                })
                .collect(),
        };

        let evidence = request
            .evidence
            .iter()
            .map(|e| structure_evidence(e, &request.concepts))
            .collect();

        let content_spec = ContentSpec {
            tone: request.tone.clone(),
            surface: request.surface,
            language: request.language.clone(),
            length_target: config.length_range(request.surface),
            banned_words: config.banned_words.clone(),
            readability_target: READABILITY_TARGET.to_string(),
            keyword_density_target: KEYWORD_DENSITY_TARGET.to_string(),
        };

        let mut tokens = config.default_tokens.clone();
        for token in &request.token_overrides {
            tokens.insert(token.key.clone(), token.value.clone());
        }

        Self {
            concept_hierarchy,
            evidence,
            content_spec,
            tokens,
            output_requirements: OutputRequirements::default(),
            context_insights: request.context_insights.clone(),
        }
    }

    pub fn primary_name(&self) -> &str {
        &self.concept_hierarchy.primary.concept.name
    }
}

fn structure_evidence(evidence: &Evidence, concepts: &[ConceptRef]) -> StructuredEvidence {
    StructuredEvidence {
        text: evidence.text.clone(),
        source: evidence.source.clone(),
        confidence: evidence.confidence,
        relevance_score: evidence.relevance_score,
        concept_alignment: concepts
            .iter()
            .map(|c| (c.name.clone(), concept_alignment(&evidence.text, &c.name)))
            .collect(),
    }
}

/// Fraction of the concept name's space-separated terms contained in `text`
pub fn concept_alignment(text: &str, concept_name: &str) -> f64 {
    let text = text.to_lowercase();
    let name = concept_name.to_lowercase();
    let terms: Vec<&str> = name.split(' ').filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return 0.0;
    }
    let matched = terms.iter().filter(|t| text.contains(**t)).count();
    matched as f64 / terms.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::request::WeightAllocation;

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            ConceptRef::new("wellness", "Wellness"),
            "Luxury",
            Surface::PropertyDetailPage,
        )
        .with_concept(ConceptRef::new("spa", "Spa"))
        .with_concept(ConceptRef::new("pools", "Pools"))
        .with_concept(ConceptRef::new("family-friendly", "Family Friendly"))
        .with_evidence(Evidence::new("The spa was relaxing and the pools were heated"))
        .with_token("CITY", "Sedona")
    }

    #[test]
    fn test_hierarchy_weights_are_fractions() {
        let payload = GenerationPayload::build(&request(), &GenerationConfig::default());
        let hierarchy = &payload.concept_hierarchy;
        assert_eq!(hierarchy.primary.weight, 0.5);
        assert_eq!(hierarchy.secondary.len(), 2);
        assert_eq!(hierarchy.secondary[0].weight, 0.15);
        assert_eq!(hierarchy.tertiary[0].weight, 0.2);
        assert!((hierarchy.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tokens_and_spec() {
        let payload = GenerationPayload::build(&request(), &GenerationConfig::default());
        assert_eq!(payload.tokens["CITY"], "Sedona");
        assert_eq!(payload.tokens["PROPERTY_NAME"], "The Grand Resort");
        assert_eq!(payload.content_spec.readability_target, "grade_8_9");
        assert_eq!(payload.content_spec.length_target, Some(LengthRange { min: 50, max: 160 }));
        assert_eq!(payload.output_requirements.variant_count, 3);
    }

    #[test]
    fn test_concept_alignment() {
        let payload = GenerationPayload::build(&request(), &GenerationConfig::default());
        let alignment = &payload.evidence[0].concept_alignment;
        assert_eq!(alignment["Spa"], 1.0);
        assert_eq!(alignment["Wellness"], 0.0);
        assert_eq!(alignment["Family Friendly"], 0.0);
        assert_eq!(concept_alignment("quiet pool bar", "Pool Bar Lounge"), 2.0 / 3.0);
    }

    #[test]
    fn test_custom_weights() {
        let req = request().with_weights(WeightAllocation {
            primary: 70.0,
            secondary: 20.0,
            tertiary: 10.0,
        });
        let payload = GenerationPayload::build(&req, &GenerationConfig::default());
        assert_eq!(payload.concept_hierarchy.primary.weight, 0.7);
        assert_eq!(payload.concept_hierarchy.secondary[1].weight, 0.1);
    }
}
