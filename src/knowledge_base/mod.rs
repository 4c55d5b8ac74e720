//! Knowledge Base - Concept reference data and identity normalization
//!
//! Holds everything the dimension scorers read:
//! - Concept definitions (semantic terms, attributes, categories, business metrics)
//! - Taxonomy graph (parents, siblings, related services and amenities)
//! - Behavioral co-occurrence and temporal demand profiles
//! - The alias table that maps incoming IDs to canonical keys

pub mod aliases;
pub mod catalog;
pub mod concepts;
mod seed;
pub mod types;

pub use aliases::{slugify, ConceptNormalizer};
pub use catalog::{Catalog, CatalogEntry};
pub use concepts::{KnowledgeBase, KnowledgeBaseBuilder, KnowledgeBaseSnapshot};
pub use types::*;
