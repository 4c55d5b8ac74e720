//! Engine Configuration
//!
//! Layered: JSON file, then environment variables (`.env` loaded through
//! `dotenv`), then CLI flags applied by the binary.

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_EVICT_BATCH, DEFAULT_TTL};
use crate::error::{AffinityError, Result};
use crate::generation::Surface;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Deterministic local templates
    Template,
    /// HTTP generation endpoint
    Endpoint,
    /// OpenAI-compatible chat completions
    OpenAi,
}

impl FromStr for BackendKind {
    type Err = AffinityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "template" => Ok(BackendKind::Template),
            "endpoint" | "http" => Ok(BackendKind::Endpoint),
            "openai" => Ok(BackendKind::OpenAi),
            other => Err(AffinityError::Config(format!(
                "Unknown backend '{}', expected template, endpoint or openai",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Chosen from the other fields when unset
    #[serde(default)]
    pub kind: Option<BackendKind>,

    /// Base URL of the generation endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_BACKEND_TIMEOUT_SECS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: None,
            endpoint: None,
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Explicit kind, else endpoint if set, else OpenAI if a key is set,
    /// else templates
    pub fn resolved_kind(&self) -> BackendKind {
        if let Some(kind) = self.kind {
            return kind;
        }
        if self.endpoint.is_some() {
            BackendKind::Endpoint
        } else if self.api_key.is_some() {
            BackendKind::OpenAi
        } else {
            BackendKind::Template
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_capacity")]
    pub capacity: usize,

    #[serde(default = "default_evict_batch")]
    pub evict_batch: usize,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_evict_batch() -> usize {
    DEFAULT_EVICT_BATCH
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            capacity: default_capacity(),
            evict_batch: default_evict_batch(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Inclusive character range
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,

    /// Target character range per surface
    #[serde(default = "default_length_limits")]
    pub length_limits: BTreeMap<Surface, LengthRange>,

    /// Token values used when the request does not override them
    #[serde(default = "default_tokens")]
    pub default_tokens: BTreeMap<String, String>,
}

fn default_banned_words() -> Vec<String> {
    ["amazing", "incredible", "unbelievable", "perfect", "ultimate"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

fn default_length_limits() -> BTreeMap<Surface, LengthRange> {
    let mut limits = BTreeMap::new();
    limits.insert(Surface::PropertyDetailPage, LengthRange { min: 50, max: 160 });
    limits.insert(Surface::SearchResults, LengthRange { min: 30, max: 120 });
    limits.insert(Surface::EmailCampaign, LengthRange { min: 20, max: 60 });
    limits.insert(Surface::SocialMedia, LengthRange { min: 100, max: 280 });
    limits
}

fn default_tokens() -> BTreeMap<String, String> {
    [
        ("PROPERTY_NAME", "The Grand Resort"),
        ("LOCATION", "Miami Beach"),
        ("CITY", "Miami"),
        ("STATE", "Florida"),
        ("COUNTRY", "United States"),
        ("PRICE_RANGE", "$150-250"),
        ("STAR_RATING", "4-star"),
        ("AMENITY_COUNT", "25+"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            banned_words: default_banned_words(),
            length_limits: default_length_limits(),
            default_tokens: default_tokens(),
        }
    }
}

impl GenerationConfig {
    pub fn length_range(&self, surface: Surface) -> Option<LengthRange> {
        self.length_limits.get(&surface).copied()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    /// JSON knowledge base snapshot; the built-in tables are used when unset
    #[serde(default)]
    pub knowledge_base_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::default();
        config.apply_vars(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// JSON file plus environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        dotenv::dotenv().ok();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AffinityError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let mut config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| AffinityError::Config(format!("Invalid config {:?}: {}", path, e)))?;
        config.apply_vars(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(kind) = get("AFFINITY_BACKEND") {
            self.backend.kind = Some(kind.parse()?);
        }
        if let Some(endpoint) = get("AFFINITY_LLM_ENDPOINT") {
            self.backend.endpoint = Some(endpoint);
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.backend.model = model;
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            self.backend.base_url = base_url;
        }
        if let Some(secs) = get("AFFINITY_BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = parse_number("AFFINITY_BACKEND_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = get("AFFINITY_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_number("AFFINITY_CACHE_TTL_SECS", &secs)?;
        }
        if let Some(capacity) = get("AFFINITY_CACHE_CAPACITY") {
            self.cache.capacity = parse_number("AFFINITY_CACHE_CAPACITY", &capacity)?;
        }
        if let Some(path) = get("AFFINITY_KB_PATH") {
            self.knowledge_base_path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AffinityError::Config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.backend.resolved_kind(), BackendKind::Template);
        assert_eq!(config.cache.ttl_secs, 900);
        assert_eq!(config.cache.capacity, 100);
        assert_eq!(
            config.generation.length_range(Surface::SocialMedia),
            Some(LengthRange { min: 100, max: 280 })
        );
        assert_eq!(config.generation.banned_words.len(), 5);
    }

    #[test]
    fn test_backend_resolution_order() {
        let env = vars(&[("OPENAI_API_KEY", "sk-test"), ("AFFINITY_LLM_ENDPOINT", "http://localhost:3000")]);
        let mut config = EngineConfig::default();
        config.apply_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.backend.resolved_kind(), BackendKind::Endpoint);

        let env = vars(&[("OPENAI_API_KEY", "sk-test")]);
        let mut config = EngineConfig::default();
        config.apply_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.backend.resolved_kind(), BackendKind::OpenAi);

        let env = vars(&[("OPENAI_API_KEY", "sk-test"), ("AFFINITY_BACKEND", "template")]);
        let mut config = EngineConfig::default();
        config.apply_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.backend.resolved_kind(), BackendKind::Template);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let env = vars(&[("AFFINITY_CACHE_TTL_SECS", "soon")]);
        let mut config = EngineConfig::default();
        let err = config.apply_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, AffinityError::Config(_)));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cache": {{"ttl_secs": 60}}, "backend": {{"timeout_secs": 5}}}}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.capacity, 100);
        assert_eq!(config.backend.timeout(), Duration::from_secs(5));
        assert_eq!(config.generation.default_tokens["CITY"], "Miami");
    }
}
