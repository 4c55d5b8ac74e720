//! Content Generation Orchestrator
//!
//! Validates a request, serves it from the result cache when possible,
//! otherwise packages the payload, delegates to the configured text backend
//! under a timeout, scores the variants and caches the outcome.
//!
//! Concurrent requests with the same fingerprint share one backend call: a
//! per-fingerprint async lock admits the first caller, the rest re-check the
//! cache once it is released.

use super::backend::{BackendResponse, EndpointBackend, TemplateBackend, TextBackend};
use super::insights::{
    editable_tokens, error_tips, evidence_excerpts, user_tips, EditableToken, EvidenceExcerpt,
    ProcessingInsights, MAX_USER_TIPS,
};
use super::llm::OpenAiBackend;
use super::payload::{GenerationPayload, VariantStyle, VARIANT_COUNT};
use super::quality::{score_variant, QualityAnalysis, VariantQuality};
use super::request::{GenerationRequest, Surface};
use crate::cache::{Fingerprint, ResultCache};
use crate::config::{BackendKind, EngineConfig, GenerationConfig, DEFAULT_BACKEND_TIMEOUT_SECS};
use crate::error::{AffinityError, GenerationError, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

const VARIANT_IDS: [&str; VARIANT_COUNT] = ["A", "B", "C"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    BuildingPayload,
    CacheHit,
    Delegating,
    AwaitingBackend,
    Scoring,
    Done,
    ReportedError,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentVariant {
    /// "A", "B" or "C"
    pub id: String,
    pub style: VariantStyle,
    pub text: String,
    pub quality: VariantQuality,
    pub evidence: Vec<EvidenceExcerpt>,
    pub editable_tokens: Vec<EditableToken>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub generated_at: DateTime<Utc>,
    pub backend: String,
    pub model_used: String,
    pub processing_time_ms: u64,
    pub primary_concept: String,
    pub secondary_concepts: Vec<String>,
    pub tone: String,
    pub surface: Surface,
    pub fingerprint: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub generation_id: String,
    pub cache_hit: bool,
    pub variants: Vec<ContentVariant>,
    pub quality_analysis: QualityAnalysis,
    pub user_tips: Vec<String>,
    pub processing_insights: ProcessingInsights,
    pub metadata: GenerationMetadata,
    /// States visited while producing this outcome
    pub states: Vec<GenerationState>,
}

pub struct ContentOrchestrator {
    backend: Arc<dyn TextBackend>,
    cache: Arc<ResultCache<GenerationOutcome>>,
    generation: GenerationConfig,
    timeout: Duration,
    in_flight: DashMap<Fingerprint, Arc<Mutex<()>>>,
}

impl ContentOrchestrator {
    /// Orchestrator on the template backend with a default cache
    pub fn new(generation: GenerationConfig) -> Self {
        Self {
            backend: Arc::new(TemplateBackend),
            cache: Arc::new(ResultCache::default()),
            generation,
            timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
            in_flight: DashMap::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let backend: Arc<dyn TextBackend> = match config.backend.resolved_kind() {
            BackendKind::Template => Arc::new(TemplateBackend),
            BackendKind::Endpoint => {
                let endpoint = config.backend.endpoint.as_deref().ok_or_else(|| {
                    AffinityError::Config("AFFINITY_LLM_ENDPOINT is not set".to_string())
                })?;
                Arc::new(EndpointBackend::new(endpoint))
            }
            BackendKind::OpenAi => Arc::new(OpenAiBackend::from_config(&config.backend)?),
        };
        info!("Content orchestrator using {} backend", backend.name());

        let cache = ResultCache::new(
            config.cache.ttl(),
            config.cache.capacity,
            config.cache.evict_batch,
        );
        Ok(Self::new(config.generation.clone())
            .with_backend(backend)
            .with_cache(Arc::new(cache))
            .with_timeout(config.backend.timeout()))
    }

    pub fn with_backend(mut self, backend: Arc<dyn TextBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_cache(mut self, cache: Arc<ResultCache<GenerationOutcome>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<ResultCache<GenerationOutcome>> {
        &self.cache
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutcome, GenerationError> {
        let started = Instant::now();
        let mut states = vec![GenerationState::Idle];

        if let Err(e) = request.validate() {
            warn!("Rejected generation request: {}", e);
            let tips = error_tips(&e);
            return Err(GenerationError::new(e, tips));
        }

        let fingerprint = request.fingerprint();
        transition(&mut states, GenerationState::BuildingPayload, &fingerprint);
        if let Some(hit) = self.cached(&fingerprint, &states) {
            return Ok(hit);
        }

        let slot = InFlightSlot::join(&self.in_flight, &fingerprint);
        let _turn = slot.lock.lock().await;

        // Another caller may have finished while we waited
        if let Some(hit) = self.cached(&fingerprint, &states) {
            return Ok(hit);
        }

        let result = self
            .produce(request, &fingerprint, &mut states, started)
            .await;
        if let Ok(outcome) = &result {
            self.cache.put(fingerprint.clone(), outcome.clone());
        }

        result.map_err(|e| {
            transition(&mut states, GenerationState::ReportedError, &fingerprint);
            warn!("Generation {} failed: {}", fingerprint, e);
            let tips = error_tips(&e);
            GenerationError::new(e, tips)
        })
    }

    fn cached(&self, fingerprint: &Fingerprint, states: &[GenerationState]) -> Option<GenerationOutcome> {
        let mut outcome = self.cache.get(fingerprint)?;
        let mut visited = states.to_vec();
        transition(&mut visited, GenerationState::CacheHit, fingerprint);
        transition(&mut visited, GenerationState::Done, fingerprint);

        outcome.cache_hit = true;
        outcome.generation_id = format!("cached_{}", Uuid::new_v4());
        outcome.states = visited;
        Some(outcome)
    }

    async fn produce(
        &self,
        request: &GenerationRequest,
        fingerprint: &Fingerprint,
        states: &mut Vec<GenerationState>,
        started: Instant,
    ) -> Result<GenerationOutcome> {
        let payload = GenerationPayload::build(request, &self.generation);

        transition(states, GenerationState::Delegating, fingerprint);
        info!(
            "Delegating '{}' to {} backend (timeout {:?})",
            payload.primary_name(),
            self.backend.name(),
            self.timeout
        );

        transition(states, GenerationState::AwaitingBackend, fingerprint);
        let response = tokio::time::timeout(self.timeout, self.backend.generate(&payload))
            .await
            .map_err(|_| AffinityError::BackendTimeout(self.timeout))??;
        response.validate()?;

        transition(states, GenerationState::Scoring, fingerprint);
        let outcome = self.assemble(&payload, response, fingerprint, states, started);
        info!(
            "Generated {} variants for '{}' in {}ms (overall {})",
            outcome.variants.len(),
            payload.primary_name(),
            outcome.metadata.processing_time_ms,
            outcome.quality_analysis.overall_score
        );
        Ok(outcome)
    }

    fn assemble(
        &self,
        payload: &GenerationPayload,
        response: BackendResponse,
        fingerprint: &Fingerprint,
        states: &mut Vec<GenerationState>,
        started: Instant,
    ) -> GenerationOutcome {
        let spec = &payload.content_spec;
        let variants: Vec<ContentVariant> = response
            .variants
            .into_iter()
            .take(VARIANT_COUNT)
            .zip(VariantStyle::ALL.iter().zip(VARIANT_IDS.iter()))
            .map(|(variant, (style, id))| {
                let text = variant.text.trim().to_string();
                ContentVariant {
                    id: id.to_string(),
                    style: *style,
                    quality: score_variant(
                        &text,
                        payload.evidence.len(),
                        spec.length_target,
                        &spec.banned_words,
                    ),
                    evidence: evidence_excerpts(*style, &payload.evidence, &text),
                    editable_tokens: editable_tokens(spec.surface),
                    text,
                }
            })
            .collect();

        let processing_insights =
            ProcessingInsights::from_payload(payload, response.processing_insights);
        let qualities: Vec<VariantQuality> = variants.iter().map(|v| v.quality.clone()).collect();
        let concept_names: Vec<&str> = payload
            .concept_hierarchy
            .all_concepts()
            .map(|c| c.concept.name.as_str())
            .collect();
        let quality_analysis = QualityAnalysis::summarize(
            &qualities,
            variants.iter().map(|v| v.text.as_str()),
            &concept_names,
            processing_insights.baseline_estimate,
        );

        let mut tips = if response.user_tips.is_empty() {
            user_tips(payload)
        } else {
            response.user_tips
        };
        tips.truncate(MAX_USER_TIPS);

        transition(states, GenerationState::Done, fingerprint);
        GenerationOutcome {
            generation_id: Uuid::new_v4().to_string(),
            cache_hit: false,
            variants,
            quality_analysis,
            user_tips: tips,
            processing_insights,
            metadata: GenerationMetadata {
                generated_at: Utc::now(),
                backend: self.backend.name().to_string(),
                model_used: response
                    .model_used
                    .unwrap_or_else(|| self.backend.name().to_string()),
                processing_time_ms: started.elapsed().as_millis() as u64,
                primary_concept: payload.primary_name().to_string(),
                secondary_concepts: payload
                    .concept_hierarchy
                    .secondary
                    .iter()
                    .map(|c| c.concept.name.clone())
                    .collect(),
                tone: spec.tone.clone(),
                surface: spec.surface,
                fingerprint: fingerprint.as_str().to_string(),
            },
            states: states.clone(),
        }
    }
}

/// One caller's share of a per-fingerprint lock. The map entry goes away when
/// the last holder drops its slot, including callers whose future was dropped.
struct InFlightSlot<'a> {
    map: &'a DashMap<Fingerprint, Arc<Mutex<()>>>,
    fingerprint: Fingerprint,
    lock: Arc<Mutex<()>>,
}

impl<'a> InFlightSlot<'a> {
    fn join(map: &'a DashMap<Fingerprint, Arc<Mutex<()>>>, fingerprint: &Fingerprint) -> Self {
        let lock = map
            .entry(fingerprint.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        Self {
            map,
            fingerprint: fingerprint.clone(),
            lock,
        }
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        let lock = std::mem::take(&mut self.lock);
        let ptr = Arc::as_ptr(&lock);
        drop(lock);
        // Only the map's own reference left, and still the same lock
        self.map.remove_if(&self.fingerprint, |_, entry| {
            Arc::as_ptr(entry) == ptr && Arc::strong_count(entry) == 1
        });
    }
}

fn transition(states: &mut Vec<GenerationState>, next: GenerationState, fingerprint: &Fingerprint) {
    debug!("Generation {}: {:?} -> {:?}", fingerprint, states.last(), next);
    states.push(next);
}
