//! Reference data types held by the knowledge base

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Business impact figures for a concept
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessMetrics {
    /// Average booking lift (0.32 = +32%)
    pub avg_booking_lift: f64,

    /// Revenue impact (fraction)
    pub revenue_impact: f64,

    /// Monthly search volume
    pub search_volume: f64,
}

/// A concept definition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Concept {
    /// Canonical concept ID (e.g., "wellness", "infinity-pool")
    pub id: String,

    /// Display name (e.g., "Wellness")
    pub name: String,

    /// Semantic terms describing the concept
    #[serde(default)]
    pub semantic_terms: Vec<String>,

    /// Descriptive attributes (e.g., "relaxing", "outdoor")
    #[serde(default)]
    pub attributes: Vec<String>,

    pub category: String,

    pub subcategory: String,

    /// Usage-pattern tags (e.g., "couples", "summer")
    #[serde(default)]
    pub usage_patterns: Vec<String>,

    /// Business metrics, when known
    #[serde(default)]
    pub business_metrics: Option<BusinessMetrics>,
}

impl Concept {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            semantic_terms: Vec::new(),
            attributes: Vec::new(),
            category: String::new(),
            subcategory: String::new(),
            usage_patterns: Vec::new(),
            business_metrics: None,
        }
    }

    pub fn with_category(mut self, category: &str, subcategory: &str) -> Self {
        self.category = category.to_string();
        self.subcategory = subcategory.to_string();
        self
    }

    pub fn with_semantic_terms(mut self, terms: &[&str]) -> Self {
        self.semantic_terms = terms.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_attributes(mut self, attributes: &[&str]) -> Self {
        self.attributes = attributes.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_usage_patterns(mut self, patterns: &[&str]) -> Self {
        self.usage_patterns = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_business_metrics(mut self, lift: f64, revenue: f64, search_volume: f64) -> Self {
        self.business_metrics = Some(BusinessMetrics {
            avg_booking_lift: lift,
            revenue_impact: revenue,
            search_volume,
        });
        self
    }
}

/// Position of a concept in the taxonomy graph
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    #[serde(default)]
    pub parents: Vec<String>,

    #[serde(default)]
    pub children: Vec<String>,

    #[serde(default)]
    pub siblings: Vec<String>,

    #[serde(default)]
    pub related_services: Vec<String>,

    #[serde(default)]
    pub related_amenities: Vec<String>,
}

/// Co-occurrence statistics from user sessions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BehavioralProfile {
    /// Peer concept → co-view rate (0..1)
    #[serde(default)]
    pub co_viewed_with: HashMap<String, f64>,

    /// Peer concept → co-booking rate (0..1)
    #[serde(default)]
    pub co_booked_with: HashMap<String, f64>,

    /// Session duration multiplier, 1.0 = baseline
    pub session_duration_impact: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonalDemand {
    pub spring: f64,
    pub summer: f64,
    pub fall: f64,
    pub winter: f64,
}

impl SeasonalDemand {
    pub fn values(&self) -> [f64; 4] {
        [self.spring, self.summer, self.fall, self.winter]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub morning: f64,
    pub afternoon: f64,
    pub evening: f64,
    pub night: f64,
}

impl DailyUsage {
    pub fn values(&self) -> [f64; 4] {
        [self.morning, self.afternoon, self.evening, self.night]
    }
}

/// Demand curves over the year and the day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemporalProfile {
    pub seasonal_demand: SeasonalDemand,

    pub daily_usage: DailyUsage,

    /// Typical booking lead time in days
    pub booking_lead_time: f64,

    /// Lowercase month names
    #[serde(default)]
    pub peak_months: Vec<String>,
}
