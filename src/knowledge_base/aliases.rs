//! Concept Identity Normalizer - Maps incoming identifiers to canonical keys
//!
//! Resolves display names ("Near The Beach"), legacy keys ("def_wellness") and
//! aliases ("swimming-pool") to the canonical IDs the knowledge base is keyed by.

use lazy_static::lazy_static;
use std::collections::HashMap;
use strsim::jaro_winkler;

lazy_static! {
    static ref BUILTIN_ALIASES: Vec<(&'static str, &'static str)> = vec![
        // Wellness
        ("Wellness", "wellness"),
        ("def_wellness", "wellness"),
        ("Spa", "spa"),
        ("spa-services", "spa"),
        // Pools
        ("Pools", "pools"),
        ("swimming-pool", "pools"),
        ("pool-bar", "pool-bar"),
        ("infinity-pool", "infinity-pool"),
        ("heated-pool", "heated-pool"),
        // Luxury
        ("Luxury", "luxury"),
        ("luxury-amenities", "luxury"),
        // Family
        ("Family-Friendly", "family-friendly"),
        ("family-amenities", "family-friendly"),
        // Business
        ("Business", "business"),
        ("business-center", "business"),
        // Location
        ("Near The Beach", "beach"),
        ("Oceanview", "oceanview"),
        ("Mountains", "mountains"),
        ("Lake", "lake"),
        ("Wine Country", "wine-country"),
        // Activities
        ("Ski", "ski"),
        ("Historic & Cultural", "historic-cultural"),
        // Accommodation
        ("All-Inclusive", "all-inclusive"),
        ("Budget-Friendly", "budget-friendly"),
        ("Cabins", "cabins"),
        ("Homes", "homes"),
        ("Trending", "trending"),
    ];
}

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Alias table plus slug fallback
#[derive(Clone, Debug, Default)]
pub struct ConceptNormalizer {
    /// Raw identifier (exact match) → canonical ID
    aliases: HashMap<String, String>,
}

impl ConceptNormalizer {
    pub fn new() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Normalizer preloaded with the built-in alias table
    pub fn with_builtin_aliases() -> Self {
        let mut normalizer = Self::new();
        for (raw, canonical) in BUILTIN_ALIASES.iter() {
            normalizer.register_alias(raw, canonical);
        }
        normalizer
    }

    pub fn register_alias(&mut self, raw: &str, canonical: &str) {
        self.aliases.insert(raw.to_string(), canonical.to_string());
    }

    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// Map a raw identifier to its canonical ID. Never fails: unknown IDs come
    /// back slugified and simply miss in the knowledge base.
    pub fn normalize(&self, raw_id: &str) -> String {
        if let Some(canonical) = self.aliases.get(raw_id) {
            return canonical.clone();
        }
        slugify(raw_id)
    }

    /// Closest known ID for an identifier that did not resolve
    pub fn suggest<'a, I>(&self, raw_id: &str, known_ids: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let normalized = self.normalize(raw_id);
        known_ids
            .into_iter()
            .map(|id| (id, jaro_winkler(&normalized, id)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id.clone())
    }
}

/// Lowercase, every character outside `[a-z0-9]` becomes `-`
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect()
}
