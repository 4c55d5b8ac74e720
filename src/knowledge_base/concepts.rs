//! Knowledge Base - Immutable registry of concept reference data
//!
//! Built once at startup (from the built-in seed or a JSON snapshot) and shared
//! behind an `Arc`. Every key and every referenced peer ID is stored in canonical
//! form, so scorers only ever compare normalized IDs.

use super::aliases::ConceptNormalizer;
use super::types::{BehavioralProfile, Concept, TaxonomyEntry, TemporalProfile};
use crate::error::{AffinityError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// On-disk form of the knowledge base
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KnowledgeBaseSnapshot {
    /// Raw ID → canonical ID
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Also load the built-in alias table
    #[serde(default)]
    pub include_builtin_aliases: bool,

    #[serde(default)]
    pub concepts: Vec<Concept>,

    #[serde(default)]
    pub taxonomy: HashMap<String, TaxonomyEntry>,

    #[serde(default)]
    pub behavioral: HashMap<String, BehavioralProfile>,

    #[serde(default)]
    pub temporal: HashMap<String, TemporalProfile>,
}

/// Concept reference tables, read-only after construction
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    normalizer: ConceptNormalizer,

    /// Concept ID → Concept
    concepts: HashMap<String, Concept>,

    /// Concept ID → taxonomy links
    taxonomy: HashMap<String, TaxonomyEntry>,

    /// Concept ID → co-occurrence stats
    behavioral: HashMap<String, BehavioralProfile>,

    /// Concept ID → demand curves
    temporal: HashMap<String, TemporalProfile>,
}

impl KnowledgeBase {
    pub fn builder(normalizer: ConceptNormalizer) -> KnowledgeBaseBuilder {
        KnowledgeBaseBuilder::new(normalizer)
    }

    /// Knowledge base seeded with the built-in travel concept tables
    pub fn builtin() -> Self {
        super::seed::builtin_knowledge_base()
    }

    pub fn from_snapshot(snapshot: KnowledgeBaseSnapshot) -> Self {
        let mut normalizer = if snapshot.include_builtin_aliases {
            ConceptNormalizer::with_builtin_aliases()
        } else {
            ConceptNormalizer::new()
        };
        for (raw, canonical) in &snapshot.aliases {
            normalizer.register_alias(raw, canonical);
        }

        let mut builder = KnowledgeBaseBuilder::new(normalizer);
        for concept in snapshot.concepts {
            builder = builder.concept(concept);
        }
        for (id, entry) in snapshot.taxonomy {
            builder = builder.taxonomy(&id, entry);
        }
        for (id, profile) in snapshot.behavioral {
            builder = builder.behavioral(&id, profile);
        }
        for (id, profile) in snapshot.temporal {
            builder = builder.temporal(&id, profile);
        }
        builder.build()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: KnowledgeBaseSnapshot = serde_json::from_str(json)
            .map_err(|e| AffinityError::KnowledgeBase(format!("Invalid knowledge base JSON: {}", e)))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a JSON snapshot from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AffinityError::KnowledgeBase(format!("Failed to read {:?}: {}", path, e))
        })?;
        let kb = Self::from_json_str(&content)?;
        info!("Loaded knowledge base from {:?} ({} concepts)", path, kb.len());
        Ok(kb)
    }

    pub fn normalizer(&self) -> &ConceptNormalizer {
        &self.normalizer
    }

    pub fn normalize(&self, raw_id: &str) -> String {
        self.normalizer.normalize(raw_id)
    }

    pub fn concept(&self, raw_id: &str) -> Option<&Concept> {
        self.concepts.get(&self.normalize(raw_id))
    }

    pub fn taxonomy(&self, raw_id: &str) -> Option<&TaxonomyEntry> {
        self.taxonomy.get(&self.normalize(raw_id))
    }

    pub fn behavioral(&self, raw_id: &str) -> Option<&BehavioralProfile> {
        self.behavioral.get(&self.normalize(raw_id))
    }

    pub fn temporal(&self, raw_id: &str) -> Option<&TemporalProfile> {
        self.temporal.get(&self.normalize(raw_id))
    }

    pub fn contains(&self, raw_id: &str) -> bool {
        self.concept(raw_id).is_some()
    }

    /// Display name for a concept, falling back to the raw ID
    pub fn display_name(&self, raw_id: &str) -> String {
        self.concept(raw_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| raw_id.to_string())
    }

    /// All concept IDs, sorted
    pub fn concept_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.concepts.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// "Did you mean" for an ID with no concept entry
    pub fn suggest(&self, raw_id: &str) -> Option<String> {
        if self.contains(raw_id) {
            return None;
        }
        self.normalizer.suggest(raw_id, self.concepts.keys())
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

/// Collects reference tables and canonicalizes every ID on the way in
pub struct KnowledgeBaseBuilder {
    normalizer: ConceptNormalizer,
    concepts: HashMap<String, Concept>,
    taxonomy: HashMap<String, TaxonomyEntry>,
    behavioral: HashMap<String, BehavioralProfile>,
    temporal: HashMap<String, TemporalProfile>,
}

impl KnowledgeBaseBuilder {
    pub fn new(normalizer: ConceptNormalizer) -> Self {
        Self {
            normalizer,
            concepts: HashMap::new(),
            taxonomy: HashMap::new(),
            behavioral: HashMap::new(),
            temporal: HashMap::new(),
        }
    }

    pub fn concept(mut self, mut concept: Concept) -> Self {
        let id = self.normalizer.normalize(&concept.id);
        concept.id = id.clone();
        if self.concepts.insert(id.clone(), concept).is_some() {
            warn!("Concept '{}' defined twice, keeping the later definition", id);
        }
        self
    }

    pub fn taxonomy(mut self, raw_id: &str, entry: TaxonomyEntry) -> Self {
        let canonical = |ids: Vec<String>| -> Vec<String> {
            ids.iter().map(|id| self.normalizer.normalize(id)).collect()
        };
        let entry = TaxonomyEntry {
            parents: canonical(entry.parents),
            children: canonical(entry.children),
            siblings: canonical(entry.siblings),
            related_services: canonical(entry.related_services),
            related_amenities: canonical(entry.related_amenities),
        };
        let id = self.normalizer.normalize(raw_id);
        self.taxonomy.insert(id, entry);
        self
    }

    pub fn behavioral(mut self, raw_id: &str, profile: BehavioralProfile) -> Self {
        let canonical = |rates: HashMap<String, f64>| -> HashMap<String, f64> {
            rates
                .into_iter()
                .map(|(peer, rate)| (self.normalizer.normalize(&peer), rate))
                .collect()
        };
        let profile = BehavioralProfile {
            co_viewed_with: canonical(profile.co_viewed_with),
            co_booked_with: canonical(profile.co_booked_with),
            session_duration_impact: profile.session_duration_impact,
        };
        let id = self.normalizer.normalize(raw_id);
        self.behavioral.insert(id, profile);
        self
    }

    pub fn temporal(mut self, raw_id: &str, mut profile: TemporalProfile) -> Self {
        profile.peak_months = profile
            .peak_months
            .iter()
            .map(|m| m.to_lowercase())
            .collect();
        let id = self.normalizer.normalize(raw_id);
        self.temporal.insert(id, profile);
        self
    }

    pub fn build(self) -> KnowledgeBase {
        KnowledgeBase {
            normalizer: self.normalizer,
            concepts: self.concepts,
            taxonomy: self.taxonomy,
            behavioral: self.behavioral,
            temporal: self.temporal,
        }
    }
}
