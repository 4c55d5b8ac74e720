//! Concept Catalog - Listing of selectable concepts from the data-access layer
//!
//! The catalog is what a ranking UI shows to the user: IDs, display names,
//! categories and a data confidence. It is loaded from the collaborator's JSON
//! export or derived from the knowledge base.

use super::concepts::KnowledgeBase;
use crate::error::{AffinityError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One selectable concept
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub category: String,

    /// Data confidence reported by the collaborator (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        // Accept both `{"entries": [...]}` and a bare array
        if let Ok(entries) = serde_json::from_str::<Vec<CatalogEntry>>(json) {
            return Ok(Self { entries });
        }
        serde_json::from_str(json)
            .map_err(|e| AffinityError::KnowledgeBase(format!("Invalid catalog JSON: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Catalog listing every concept in the knowledge base, sorted by ID
    pub fn from_knowledge_base(kb: &KnowledgeBase) -> Self {
        let entries = kb
            .concept_ids()
            .into_iter()
            .filter_map(|id| kb.concept(&id).cloned())
            .map(|c| CatalogEntry {
                id: c.id,
                name: c.name,
                category: c.category,
                confidence: default_confidence(),
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Case-insensitive substring match on name or ID
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&query) || e.id.contains(&query))
            .collect()
    }

    pub fn in_category(&self, category: &str) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// IDs of every entry except `exclude`, in catalog order
    pub fn candidate_ids(&self, exclude: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.id != exclude)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_knowledge_base() {
        let kb = KnowledgeBase::builtin();
        let catalog = Catalog::from_knowledge_base(&kb);
        assert_eq!(catalog.len(), kb.len());
        assert_eq!(catalog.get("spa").unwrap().category, "wellness");
        assert!(catalog.candidate_ids("spa").iter().all(|id| id != "spa"));
    }

    #[test]
    fn test_catalog_json_forms() {
        let bare = r#"[{"id": "spa", "name": "Spa", "category": "wellness", "confidence": 0.9}]"#;
        let wrapped = r#"{"entries": [{"id": "spa", "name": "Spa"}]}"#;

        let a = Catalog::from_json_str(bare).unwrap();
        let b = Catalog::from_json_str(wrapped).unwrap();
        assert_eq!(a.get("spa").unwrap().confidence, 0.9);
        assert_eq!(b.get("spa").unwrap().confidence, 1.0);
        assert!(Catalog::from_json_str("nope").is_err());
    }

    #[test]
    fn test_search_and_category() {
        let kb = KnowledgeBase::builtin();
        let catalog = Catalog::from_knowledge_base(&kb);
        let pools: Vec<_> = catalog.search("pool").iter().map(|e| e.id.clone()).collect();
        assert!(pools.contains(&"infinity-pool".to_string()));
        assert!(catalog.in_category("business").len() >= 3);
    }
}
