pub mod cache;
pub mod config;
pub mod error;
pub mod evidence;
pub mod generation;
pub mod knowledge_base;
pub mod roles;
pub mod similarity;

pub use cache::{Fingerprint, ResultCache};
pub use config::{BackendKind, EngineConfig, GenerationConfig};
pub use error::{AffinityError, GenerationError, Result};
pub use evidence::Evidence;
pub use generation::{ContentOrchestrator, GenerationOutcome, GenerationRequest, Surface};
pub use knowledge_base::{Catalog, Concept, ConceptNormalizer, KnowledgeBase};
pub use roles::{assign_roles, assign_roles_with, ConceptRole, Role, RoleWeights};
pub use similarity::{
    Confidence, Dimension, DimensionResult, DimensionScorer, RankedConcept, SimilarityEngine,
    SimilarityResult,
};
