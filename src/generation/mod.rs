//! Content generation: request validation, payload packaging, text backends,
//! quality scoring and the orchestrator that ties them to the result cache

pub mod backend;
pub mod insights;
pub mod llm;
pub mod orchestrator;
pub mod payload;
pub mod quality;
pub mod request;

pub use backend::{BackendResponse, BackendVariant, EndpointBackend, TemplateBackend, TextBackend};
pub use insights::{EditableToken, EvidenceExcerpt, ProcessingInsights};
pub use llm::OpenAiBackend;
pub use orchestrator::{
    ContentOrchestrator, ContentVariant, GenerationMetadata, GenerationOutcome, GenerationState,
};
pub use payload::{ConceptHierarchy, GenerationPayload, StructuredEvidence, VariantStyle};
pub use quality::{QualityAnalysis, VariantQuality};
pub use request::{ConceptRef, GenerationRequest, Surface, TokenOverride, WeightAllocation};
