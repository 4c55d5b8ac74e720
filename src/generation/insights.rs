//! User tips, processing insights, editable tokens and evidence excerpts

use super::payload::{GenerationPayload, StructuredEvidence, VariantStyle};
use super::quality::baseline_estimate;
use super::request::Surface;
use crate::config::LengthRange;
use crate::error::AffinityError;
use crate::similarity::Confidence;
use serde::{Deserialize, Serialize};

pub const MAX_USER_TIPS: usize = 4;

/// Tips derived from the shape of the request, most specific first
pub fn user_tips(payload: &GenerationPayload) -> Vec<String> {
    let hierarchy = &payload.concept_hierarchy;
    let evidence = &payload.evidence;
    let mut tips = Vec::new();

    if hierarchy.secondary.is_empty() {
        tips.push("Consider adding secondary concepts to create richer, more comprehensive descriptions".to_string());
    }
    if hierarchy.primary.weight < 0.4 {
        tips.push("Primary concept weight is low - consider increasing it for stronger thematic focus".to_string());
    }
    if evidence.len() < 3 {
        tips.push("More evidence sources will improve content authenticity and trustworthiness".to_string());
    }
    let low = evidence.iter().filter(|e| e.confidence == Confidence::Low).count();
    if low as f64 > evidence.len() as f64 * 0.5 {
        tips.push("Consider filtering out low-confidence evidence for better quality results".to_string());
    }
    if payload.content_spec.surface == Surface::SocialMedia && payload.content_spec.tone == "Business" {
        tips.push("Business tone might be too formal for social media - consider a more casual approach".to_string());
    }

    tips.push("Use the Evidence tab to review which traveler insights support each concept".to_string());
    tips.push("Check the Tokens tab to customize property-specific details before publishing".to_string());
    tips.truncate(MAX_USER_TIPS);
    tips
}

/// Remediation tips attached to a failed generation
pub fn error_tips(cause: &AffinityError) -> Vec<String> {
    let tips: &[&str] = match cause {
        AffinityError::InvalidRequest(_) => &[
            "Select a primary concept before generating",
            "Token keys must be UPPER_SNAKE_CASE with a non-empty value",
            "Keep each concept weight within 0-100 and the total at or below 100",
        ],
        _ => &[
            "Check your internet connection and try again",
            "Consider simplifying your concept selection",
            "Ensure evidence sources are properly formatted",
        ],
    };
    tips.iter().map(|t| t.to_string()).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptProcessing {
    pub primary_weight_applied: f64,
    pub secondary_concepts_count: usize,
    pub tertiary_concepts_count: usize,
    pub total_concept_coverage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceProcessing {
    pub total_evidence_pieces: usize,
    pub high_confidence_count: usize,
    pub medium_confidence_count: usize,
    pub low_confidence_count: usize,
    /// 0 when there is no evidence
    pub average_relevance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentOptimization {
    pub target_length: Option<LengthRange>,
    pub tone_applied: String,
    pub surface_optimized: Surface,
    pub banned_words_filtered: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInsights {
    pub concept_processing: ConceptProcessing,
    pub evidence_processing: EvidenceProcessing,
    pub content_optimization: ContentOptimization,
    pub baseline_estimate: u32,
    /// Whatever the backend reported about its own processing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_insights: Option<serde_json::Value>,
}

impl ProcessingInsights {
    pub fn from_payload(payload: &GenerationPayload, backend_insights: Option<serde_json::Value>) -> Self {
        let hierarchy = &payload.concept_hierarchy;
        let evidence = &payload.evidence;
        let count = |c: Confidence| evidence.iter().filter(|e| e.confidence == c).count();
        let average_relevance = if evidence.is_empty() {
            0.0
        } else {
            evidence.iter().map(|e| e.relevance_score).sum::<f64>() / evidence.len() as f64
        };

        Self {
            concept_processing: ConceptProcessing {
                primary_weight_applied: hierarchy.primary.weight,
                secondary_concepts_count: hierarchy.secondary.len(),
                tertiary_concepts_count: hierarchy.tertiary.len(),
                total_concept_coverage: hierarchy.total_weight(),
            },
            evidence_processing: EvidenceProcessing {
                total_evidence_pieces: evidence.len(),
                high_confidence_count: count(Confidence::High),
                medium_confidence_count: count(Confidence::Medium),
                low_confidence_count: count(Confidence::Low),
                average_relevance,
            },
            content_optimization: ContentOptimization {
                target_length: payload.content_spec.length_target,
                tone_applied: payload.content_spec.tone.clone(),
                surface_optimized: payload.content_spec.surface,
                banned_words_filtered: payload.content_spec.banned_words.len(),
            },
            baseline_estimate: baseline_for(payload),
            backend_insights,
        }
    }
}

/// Baseline quality estimate from the payload's role weights
pub fn baseline_for(payload: &GenerationPayload) -> u32 {
    let hierarchy = &payload.concept_hierarchy;
    let secondary: f64 = hierarchy.secondary.iter().map(|c| c.weight).sum();
    let tertiary: f64 = hierarchy.tertiary.iter().map(|c| c.weight).sum();
    baseline_estimate(
        hierarchy.primary.weight,
        secondary,
        tertiary,
        payload.context_insights.len(),
    )
}

/// A `{{TOKEN}}` placeholder shown to the user with a sample value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditableToken {
    pub placeholder: String,
    pub value: String,
    pub editable: bool,
}

fn token(placeholder: &str, value: &str, editable: bool) -> EditableToken {
    EditableToken {
        placeholder: placeholder.to_string(),
        value: value.to_string(),
        editable,
    }
}

/// Common tokens plus those specific to `surface`
pub fn editable_tokens(surface: Surface) -> Vec<EditableToken> {
    let mut tokens = vec![
        token("{{PROPERTY_NAME}}", "Mountain View Resort", true),
        token("{{LOCATION}}", "Colorado Springs", true),
    ];
    let specific = match surface {
        Surface::PropertyDetailPage => [
            token("{{BOOKING_URL}}", "/book-now", true),
            token("{{PHONE}}", "(555) 123-4567", true),
        ],
        Surface::SearchResults => [
            token("{{PRICE}}", "$299/night", true),
            token("{{RATING}}", "4.8/5", false),
        ],
        Surface::EmailCampaign => [
            token("{{GUEST_NAME}}", "Valued Guest", false),
            token("{{DISCOUNT}}", "15%", true),
        ],
        Surface::SocialMedia => [
            token("{{HASHTAG}}", "#LuxuryTravel", true),
            token("{{HANDLE}}", "@resort", true),
        ],
    };
    tokens.extend(specific);
    tokens
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceExcerpt {
    pub sentence: String,
    pub source: String,
    pub confidence: Confidence,
    /// First evidence word (over 3 chars) that also appears in the variant
    pub matching_text: Option<String>,
}

/// Evidence shown next to a variant: up to 5 pieces (3 for concise copy).
/// Persuasive copy leads with the most confident evidence.
pub fn evidence_excerpts(
    style: VariantStyle,
    evidence: &[StructuredEvidence],
    variant_text: &str,
) -> Vec<EvidenceExcerpt> {
    let limit = match style {
        VariantStyle::Concise => 3,
        _ => 5,
    };
    let mut ordered: Vec<&StructuredEvidence> = evidence.iter().collect();
    if style == VariantStyle::Persuasive {
        ordered.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    }

    let variant_lower = variant_text.to_lowercase();
    ordered
        .into_iter()
        .take(limit)
        .map(|e| EvidenceExcerpt {
            sentence: e.text.clone(),
            source: e.source.clone(),
            confidence: e.confidence,
            matching_text: e
                .text
                .split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
                .find(|w| w.chars().count() > 3 && variant_lower.contains(w.as_str())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::evidence::Evidence;
    use crate::generation::request::{ConceptRef, GenerationRequest, WeightAllocation};

    fn request(surface: Surface, tone: &str) -> GenerationRequest {
        GenerationRequest::new(ConceptRef::new("wellness", "Wellness"), tone, surface)
    }

    #[test]
    fn test_tips_capped_and_ordered() {
        let req = request(Surface::SocialMedia, "Business").with_weights(WeightAllocation {
            primary: 30.0,
            secondary: 30.0,
            tertiary: 20.0,
        });
        let payload = GenerationPayload::build(&req, &GenerationConfig::default());
        let tips = user_tips(&payload);
        assert_eq!(tips.len(), MAX_USER_TIPS);
        assert!(tips[0].starts_with("Consider adding secondary concepts"));
        assert!(tips[1].starts_with("Primary concept weight is low"));
        assert!(tips[3].starts_with("Business tone"));
    }

    #[test]
    fn test_tips_for_complete_request() {
        let req = request(Surface::PropertyDetailPage, "Luxury")
            .with_concept(ConceptRef::new("spa", "Spa"))
            .with_evidence(Evidence::new("a"))
            .with_evidence(Evidence::new("b"))
            .with_evidence(Evidence::new("c"));
        let payload = GenerationPayload::build(&req, &GenerationConfig::default());
        let tips = user_tips(&payload);
        assert_eq!(tips.len(), 2);
        assert!(tips[0].contains("Evidence tab"));
    }

    #[test]
    fn test_error_tips() {
        let backend = error_tips(&AffinityError::Backend("down".to_string()));
        assert_eq!(backend[0], "Check your internet connection and try again");
        let invalid = error_tips(&AffinityError::InvalidRequest("x".to_string()));
        assert!(invalid[0].contains("primary concept"));
    }

    #[test]
    fn test_processing_insights() {
        let req = request(Surface::PropertyDetailPage, "Luxury")
            .with_concept(ConceptRef::new("spa", "Spa"))
            .with_evidence(Evidence::new("Great spa").with_confidence(Confidence::High))
            .with_context_insight("Couples book spa packages");
        let payload = GenerationPayload::build(&req, &GenerationConfig::default());
        let insights = ProcessingInsights::from_payload(&payload, None);
        assert_eq!(insights.concept_processing.secondary_concepts_count, 1);
        assert_eq!(insights.evidence_processing.high_confidence_count, 1);
        assert_eq!(insights.evidence_processing.average_relevance, 0.8);
        assert_eq!(insights.content_optimization.banned_words_filtered, 5);
        // 75 + 7.5 + 2.4 + 0 + 1.5
        assert_eq!(insights.baseline_estimate, 86);
    }

    #[test]
    fn test_editable_tokens_per_surface() {
        let tokens = editable_tokens(Surface::SearchResults);
        assert_eq!(tokens.len(), 4);
        assert!(!tokens.iter().find(|t| t.placeholder == "{{RATING}}").unwrap().editable);
        let social = editable_tokens(Surface::SocialMedia);
        assert_eq!(social[2].placeholder, "{{HASHTAG}}");
    }

    #[test]
    fn test_evidence_excerpts() {
        let req = request(Surface::PropertyDetailPage, "Luxury")
            .with_evidence(Evidence::new("Quiet rooms"))
            .with_evidence(Evidence::new("The wellness center was superb").with_confidence(Confidence::High));
        let payload = GenerationPayload::build(&req, &GenerationConfig::default());
        let text = "Discover why our wellness sets us apart.";

        let persuasive = evidence_excerpts(VariantStyle::Persuasive, &payload.evidence, text);
        assert_eq!(persuasive[0].confidence, Confidence::High);
        assert_eq!(persuasive[0].matching_text.as_deref(), Some("wellness"));
        assert_eq!(persuasive[1].matching_text, None);

        let descriptive = evidence_excerpts(VariantStyle::Descriptive, &payload.evidence, text);
        assert_eq!(descriptive[0].sentence, "Quiet rooms");
    }
}
