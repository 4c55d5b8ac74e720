//! OpenAI-compatible chat completions backend

use super::backend::{BackendResponse, TextBackend};
use super::payload::GenerationPayload;
use crate::config::BackendConfig;
use crate::error::{AffinityError, Result};
use async_trait::async_trait;
use tracing::info;

pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AffinityError::Config("OPENAI_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, config.model.clone(), config.base_url.clone()))
    }

    async fn call_llm(&self, system_prompt: &str, user_prompt: &str) -> Result<(String, Option<String>)> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "temperature": 0.7,
            "max_tokens": 1500
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AffinityError::Backend(format!("LLM API call failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AffinityError::Backend(format!("LLM API returned {}", status)));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AffinityError::Backend(format!("Failed to parse LLM response: {}", e)))?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AffinityError::Backend("No content in LLM response".to_string()))?;
        let model = response_json["model"].as_str().map(|m| m.to_string());

        Ok((content.to_string(), model))
    }
}

#[async_trait]
impl TextBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, payload: &GenerationPayload) -> Result<BackendResponse> {
        info!("Requesting {} variants from {}", payload.output_requirements.variant_count, self.model);
        let (content, model) = self
            .call_llm(&build_system_prompt(payload), &build_user_prompt(payload))
            .await?;

        let mut parsed = parse_chat_content(&content)?;
        if parsed.model_used.is_none() {
            parsed.model_used = model.or_else(|| Some(self.model.clone()));
        }
        Ok(parsed)
    }
}

/// Decode the JSON document inside a chat reply
pub fn parse_chat_content(content: &str) -> Result<BackendResponse> {
    serde_json::from_str(&extract_json(content))
        .map_err(|e| AffinityError::Backend(format!("Invalid LLM response format: {}", e)))
}

/// Extract a JSON object from a reply that may wrap it in a markdown fence
pub fn extract_json(response: &str) -> String {
    if let Some(start) = response.find("```json") {
        let after_start = &response[start + 7..];
        if let Some(end) = after_start.find("```") {
            return after_start[..end].trim().to_string();
        }
    }
    if let Some(start) = response.find("```") {
        let after_start = &response[start + 3..];
        if let Some(end) = after_start.find("```") {
            return after_start[..end].trim().to_string();
        }
    }

    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => response[start..=end].to_string(),
        _ => response.trim().to_string(),
    }
}

pub fn build_system_prompt(payload: &GenerationPayload) -> String {
    format!(
        r#"You are an expert copywriter for travel property listings, writing descriptions that turn browsers into bookers.

Generate {} property description variants that:
1. Blend the provided concepts according to their weights
2. Integrate the traveler evidence naturally
3. Match the specified tone and surface
4. Use the available {{{{TOKEN}}}} placeholders for property details
5. Stay readable at {} with a keyword density of {}
6. Never use these words: {}

Return ONLY JSON with this structure:
{{
  "success": true,
  "variants": [
    {{"id": "A", "style": "descriptive", "snippet": "Generated content here..."}}
  ],
  "user_tips": ["Helpful tips for the user"],
  "processing_insights": {{"key": "insights about processing"}}
}}"#,
        payload.output_requirements.variant_count,
        payload.content_spec.readability_target,
        payload.content_spec.keyword_density_target,
        payload.content_spec.banned_words.join(", ")
    )
}

pub fn build_user_prompt(payload: &GenerationPayload) -> String {
    let hierarchy = &payload.concept_hierarchy;
    let list = |concepts: &[super::payload::WeightedConcept]| -> String {
        concepts
            .iter()
            .map(|c| format!("{} ({:.2})", c.concept.name, c.weight))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let evidence = payload
        .evidence
        .iter()
        .map(|e| format!("- \"{}\" ({} confidence)", e.text, e.confidence))
        .collect::<Vec<_>>()
        .join("\n");

    let length = payload
        .content_spec
        .length_target
        .map(|r| format!("{}-{} characters", r.min, r.max))
        .unwrap_or_else(|| "no limit".to_string());

    let tokens = payload
        .tokens
        .keys()
        .map(|k| format!("{{{{{}}}}}", k))
        .collect::<Vec<_>>()
        .join(", ");

    let styles = payload
        .output_requirements
        .variant_styles
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        r#"Generate property descriptions with these specifications:

CONCEPT HIERARCHY:
Primary ({:.2}): {}
Secondary: {}
Tertiary: {}

EVIDENCE TO INTEGRATE:
{}

CONTENT SPECIFICATIONS:
- Surface: {}
- Tone: {}
- Length: {}
- Language: {}

AVAILABLE TOKENS:
{}
"#,
        hierarchy.primary.weight,
        hierarchy.primary.concept.name,
        list(&hierarchy.secondary[..]),
        list(&hierarchy.tertiary[..]),
        evidence,
        payload.content_spec.surface,
        payload.content_spec.tone,
        length,
        payload.content_spec.language,
        tokens
    );

    if !payload.context_insights.is_empty() {
        prompt.push_str("\nCONTEXT INSIGHTS:\n");
        for insight in &payload.context_insights {
            prompt.push_str(&format!("- {}\n", insight));
        }
    }

    prompt.push_str(&format!(
        "\nGenerate {} variants ({}) that naturally weave these concepts and evidence together.",
        payload.output_requirements.variant_count, styles
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::evidence::Evidence;
    use crate::generation::request::{ConceptRef, GenerationRequest, Surface};

    fn payload() -> GenerationPayload {
        let request = GenerationRequest::new(
            ConceptRef::new("wellness", "Wellness"),
            "Luxury",
            Surface::EmailCampaign,
        )
        .with_concept(ConceptRef::new("spa", "Spa"))
        .with_evidence(Evidence::new("Best massage of my life"))
        .with_context_insight("Guests travel as couples");
        GenerationPayload::build(&request, &GenerationConfig::default())
    }

    #[test]
    fn test_extract_json_from_fence() {
        let reply = "Here you go:\n```json\n{\"variants\": []}\n```\nThanks";
        assert_eq!(extract_json(reply), "{\"variants\": []}");
        assert_eq!(extract_json("noise {\"a\": 1} noise"), "{\"a\": 1}");
        assert_eq!(extract_json("no json"), "no json");
    }

    #[test]
    fn test_parse_chat_content() {
        let reply = r#"```json
{"success": true, "variants": [
  {"id": "A", "style": "descriptive", "snippet": "One."},
  {"id": "B", "style": "persuasive", "snippet": "Two."},
  {"id": "C", "style": "concise", "snippet": "Three."}
]}
```"#;
        let parsed = parse_chat_content(reply).unwrap();
        assert_eq!(parsed.variants.len(), 3);
        assert!(parsed.validate().is_ok());
        assert!(matches!(
            parse_chat_content("I cannot help with that"),
            Err(AffinityError::Backend(_))
        ));
    }

    #[test]
    fn test_prompts_carry_payload() {
        let payload = payload();
        let system = build_system_prompt(&payload);
        assert!(system.contains("Generate 3 property description variants"));
        assert!(system.contains("amazing, incredible"));
        assert!(system.contains("{{TOKEN}}"));

        let user = build_user_prompt(&payload);
        assert!(user.contains("Primary (0.50): Wellness"));
        assert!(user.contains("Secondary: Spa (0.30)"));
        assert!(user.contains("- \"Best massage of my life\" (medium confidence)"));
        assert!(user.contains("- Length: 20-60 characters"));
        assert!(user.contains("{{PROPERTY_NAME}}"));
        assert!(user.contains("- Guests travel as couples"));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = BackendConfig::default();
        assert!(matches!(
            OpenAiBackend::from_config(&config),
            Err(AffinityError::Config(_))
        ));
    }
}
