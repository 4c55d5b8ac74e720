//! Text backends - pluggable generators behind one async trait
//!
//! `TemplateBackend` is deterministic and local. `EndpointBackend` posts the
//! payload to an HTTP generation service. The chat-completions backend lives in
//! `llm.rs`.

use super::payload::{GenerationPayload, VariantStyle, VARIANT_COUNT};
use crate::error::{AffinityError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One variant as returned by a backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendVariant {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub style: Option<String>,

    #[serde(alias = "snippet", alias = "content")]
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    /// Set to false by services that report failure in-band
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub variants: Vec<BackendVariant>,

    #[serde(default, alias = "model")]
    pub model_used: Option<String>,

    #[serde(default)]
    pub user_tips: Vec<String>,

    #[serde(default)]
    pub processing_insights: Option<serde_json::Value>,
}

impl BackendResponse {
    /// Check the response carries exactly the variants we asked for
    pub fn validate(&self) -> Result<()> {
        if self.success == Some(false) {
            return Err(AffinityError::Backend(
                self.error
                    .clone()
                    .unwrap_or_else(|| "Backend reported failure".to_string()),
            ));
        }
        if self.variants.len() < VARIANT_COUNT {
            return Err(AffinityError::Backend(format!(
                "Expected {} variants, backend returned {}",
                VARIANT_COUNT,
                self.variants.len()
            )));
        }
        if let Some(i) = self
            .variants
            .iter()
            .take(VARIANT_COUNT)
            .position(|v| v.text.trim().is_empty())
        {
            return Err(AffinityError::Backend(format!("Variant {} has empty text", i + 1)));
        }
        Ok(())
    }
}

#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Short name reported in metadata and logs
    fn name(&self) -> &'static str;

    async fn generate(&self, payload: &GenerationPayload) -> Result<BackendResponse>;
}

/// Adjective for a brand tone
pub fn tone_adjective(tone: &str) -> &'static str {
    match tone {
        "Luxury" => "premium",
        "Pet-Friendly" => "welcoming",
        "Family-Friendly" => "family-oriented",
        "Business" => "professional",
        "Value" => "affordable",
        _ => "exceptional",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Deterministic local generator: three styled variants that always name the
/// primary concept
#[derive(Clone, Debug, Default)]
pub struct TemplateBackend;

impl TemplateBackend {
    pub fn render(style: VariantStyle, payload: &GenerationPayload) -> String {
        let adjective = tone_adjective(&payload.content_spec.tone);
        let primary = payload.primary_name().to_lowercase();
        let secondary: Vec<String> = payload
            .concept_hierarchy
            .secondary
            .iter()
            .map(|c| c.concept.name.to_lowercase())
            .collect();

        let mut text = String::new();
        match style {
            VariantStyle::Descriptive => {
                text.push_str(&format!(
                    "Experience the {} comfort of our {}. ",
                    adjective, primary
                ));
                if !secondary.is_empty() {
                    text.push_str(&format!(
                        "Enjoy {} while taking advantage of our premium facilities. ",
                        secondary.join(" and ")
                    ));
                }
                text.push_str(&format!(
                    "Ideal for guests seeking {} accommodations with thoughtful amenities.",
                    adjective
                ));
            }
            VariantStyle::Persuasive => {
                text.push_str(&format!("Discover why our {} sets us apart. ", primary));
                if !secondary.is_empty() {
                    text.push_str(&format!(
                        "With {}, we deliver {} experiences that exceed expectations. ",
                        secondary.join(" and "),
                        adjective
                    ));
                }
                text.push_str(&format!("Book now for an unforgettable {} getaway.", adjective));
            }
            VariantStyle::Concise => {
                text.push_str(&format!("{} {} available. ", capitalize(adjective), primary));
                if !secondary.is_empty() {
                    text.push_str(&format!("Includes {}. ", secondary.join(" & ")));
                }
                text.push_str("Reserve today.");
            }
        }
        text
    }
}

#[async_trait]
impl TextBackend for TemplateBackend {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, payload: &GenerationPayload) -> Result<BackendResponse> {
        debug!("Rendering template variants for '{}'", payload.primary_name());
        let variants = VariantStyle::ALL
            .iter()
            .map(|style| BackendVariant {
                id: None,
                style: Some(style.as_str().to_string()),
                text: Self::render(*style, payload),
            })
            .collect();

        Ok(BackendResponse {
            success: Some(true),
            variants,
            model_used: Some("template".to_string()),
            ..Default::default()
        })
    }
}

/// HTTP generation service: `POST {endpoint}/api/generate-snippet`
pub struct EndpointBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl EndpointBackend {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/api/generate-snippet", self.endpoint)
    }
}

#[async_trait]
impl TextBackend for EndpointBackend {
    fn name(&self) -> &'static str {
        "endpoint"
    }

    async fn generate(&self, payload: &GenerationPayload) -> Result<BackendResponse> {
        let url = self.url();
        info!("Calling generation endpoint {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| AffinityError::Backend(format!("Generation endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AffinityError::Backend(format!(
                "Generation endpoint returned {}",
                status
            )));
        }

        response
            .json::<BackendResponse>()
            .await
            .map_err(|e| AffinityError::Backend(format!("Malformed endpoint response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::generation::request::{ConceptRef, GenerationRequest, Surface};

    fn payload(tone: &str) -> GenerationPayload {
        let request = GenerationRequest::new(
            ConceptRef::new("wellness", "Wellness"),
            tone,
            Surface::PropertyDetailPage,
        )
        .with_concept(ConceptRef::new("spa", "Spa"));
        GenerationPayload::build(&request, &GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_template_variants_mention_primary() {
        let response = TemplateBackend.generate(&payload("Luxury")).await.unwrap();
        assert!(response.validate().is_ok());
        assert_eq!(response.variants.len(), 3);
        for variant in &response.variants {
            assert!(variant.text.contains("wellness"));
        }
        assert_eq!(
            response.variants[2].text,
            "Premium wellness available. Includes spa. Reserve today."
        );
    }

    #[test]
    fn test_tone_adjectives() {
        assert_eq!(tone_adjective("Business"), "professional");
        assert_eq!(tone_adjective("Romantic"), "exceptional");
    }

    #[test]
    fn test_response_validation() {
        let short = BackendResponse {
            variants: vec![BackendVariant {
                id: None,
                style: None,
                text: "One".to_string(),
            }],
            ..Default::default()
        };
        assert!(matches!(short.validate(), Err(AffinityError::Backend(_))));

        let failed = BackendResponse {
            success: Some(false),
            error: Some("quota exceeded".to_string()),
            ..Default::default()
        };
        let err = failed.validate().unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_response_accepts_snippet_field() {
        let json = r#"{"success": true, "model": "gpt-4", "variants": [
            {"id": "A", "snippet": "One."}, {"id": "B", "snippet": "Two."}, {"id": "C", "snippet": ""}
        ]}"#;
        let response: BackendResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.model_used.as_deref(), Some("gpt-4"));
        assert!(response.validate().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_backend_error() {
        let backend = EndpointBackend::new("http://127.0.0.1:9/");
        assert_eq!(backend.url(), "http://127.0.0.1:9/api/generate-snippet");
        let err = backend.generate(&payload("Luxury")).await.unwrap_err();
        assert!(matches!(err, AffinityError::Backend(_)));
    }
}
