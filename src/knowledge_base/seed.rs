//! Built-in travel concept tables
//!
//! 31 concepts with semantic terms, attributes and business metrics, plus the
//! taxonomy graph and behavioral/temporal profiles for the pool cluster. Keys
//! and peer IDs pass through the builder, so legacy names like `swimming-pool`
//! land on their canonical IDs.

use super::aliases::ConceptNormalizer;
use super::concepts::KnowledgeBase;
use super::types::{
    BehavioralProfile, Concept, DailyUsage, SeasonalDemand, TaxonomyEntry, TemporalProfile,
};
use std::collections::HashMap;

fn concept(
    id: &str,
    name: &str,
    semantic: &[&str],
    attributes: &[&str],
    category: (&str, &str),
    usage: &[&str],
    metrics: (f64, f64, f64),
) -> Concept {
    Concept::new(id, name)
        .with_semantic_terms(semantic)
        .with_attributes(attributes)
        .with_category(category.0, category.1)
        .with_usage_patterns(usage)
        .with_business_metrics(metrics.0, metrics.1, metrics.2)
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn rates(list: &[(&str, f64)]) -> HashMap<String, f64> {
    list.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn taxonomy(
    parents: &[&str],
    children: &[&str],
    siblings: &[&str],
    related_services: &[&str],
    related_amenities: &[&str],
) -> TaxonomyEntry {
    TaxonomyEntry {
        parents: ids(parents),
        children: ids(children),
        siblings: ids(siblings),
        related_services: ids(related_services),
        related_amenities: ids(related_amenities),
    }
}

fn temporal(
    seasonal: [f64; 4],
    daily: [f64; 4],
    booking_lead_time: f64,
    peak_months: &[&str],
) -> TemporalProfile {
    TemporalProfile {
        seasonal_demand: SeasonalDemand {
            spring: seasonal[0],
            summer: seasonal[1],
            fall: seasonal[2],
            winter: seasonal[3],
        },
        daily_usage: DailyUsage {
            morning: daily[0],
            afternoon: daily[1],
            evening: daily[2],
            night: daily[3],
        },
        booking_lead_time,
        peak_months: ids(peak_months),
    }
}

fn builtin_concepts() -> Vec<Concept> {
    vec![
        concept(
            "wellness",
            "Wellness",
            &["wellness", "health", "relaxation", "spa", "massage", "therapy", "rejuvenation", "mindfulness"],
            &["relaxing", "therapeutic", "premium", "health-focused", "restorative", "peaceful"],
            ("wellness", "health-wellness"),
            &["vacation", "relaxation", "self-care", "couples", "wellness-retreat"],
            (0.32, 0.38, 5200.0),
        ),
        concept(
            "spa",
            "Spa",
            &["spa", "wellness", "massage", "treatment", "relaxation", "therapy", "rejuvenation"],
            &["indoor", "premium", "therapeutic", "relaxing", "staffed", "appointment-based"],
            ("wellness", "spa-treatment"),
            &["vacation", "relaxation", "wellness", "couples", "self-care"],
            (0.35, 0.42, 4200.0),
        ),
        concept(
            "pools",
            "Pools",
            &["water", "recreation", "amenity", "leisure", "swimming", "pool", "aquatic"],
            &["wet", "outdoor", "recreational", "family-friendly", "seasonal", "maintenance"],
            ("amenity", "water-feature"),
            &["summer", "vacation", "family-time", "exercise", "relaxation"],
            (0.23, 0.18, 8500.0),
        ),
        concept(
            "luxury",
            "Luxury",
            &["luxury", "premium", "high-end", "exclusive", "upscale", "sophisticated", "elegant"],
            &["premium", "expensive", "exclusive", "high-quality", "sophisticated", "upscale"],
            ("experience", "luxury"),
            &["luxury-travel", "special-occasion", "honeymoon", "anniversary", "premium-experience"],
            (0.45, 0.62, 3800.0),
        ),
        concept(
            "family-friendly",
            "Family-Friendly",
            &["family", "kids", "children", "safe", "appropriate", "fun", "activities"],
            &["family-oriented", "safe", "age-appropriate", "fun", "supervised", "educational"],
            ("family", "family-amenities"),
            &["family-vacation", "kids-activities", "multi-generational", "safe-environment"],
            (0.28, 0.22, 6200.0),
        ),
        concept(
            "business",
            "Business",
            &["business", "work", "meeting", "conference", "corporate", "professional", "wifi"],
            &["professional", "work-friendly", "meeting-capable", "wifi-enabled", "business-services"],
            ("business", "business-amenities"),
            &["business-travel", "meetings", "conferences", "work-remote", "corporate-events"],
            (0.18, 0.25, 4800.0),
        ),
        concept(
            "beach",
            "Near The Beach",
            &["beach", "ocean", "sand", "waves", "coastal", "seaside", "waterfront"],
            &["coastal", "sandy", "sunny", "water-access", "scenic", "recreational"],
            ("location", "coastal"),
            &["beach-vacation", "summer", "water-activities", "sunbathing", "coastal-walks"],
            (0.41, 0.35, 9200.0),
        ),
        concept(
            "oceanview",
            "Oceanview",
            &["ocean", "view", "scenic", "panoramic", "waterfront", "coastal", "vista"],
            &["scenic", "premium", "view-focused", "coastal", "panoramic", "desirable"],
            ("location", "view"),
            &["romantic", "scenic", "photography", "relaxation", "premium-experience"],
            (0.38, 0.44, 3400.0),
        ),
        concept(
            "mountains",
            "Mountains",
            &["mountains", "peaks", "alpine", "hiking", "nature", "scenic", "elevation"],
            &["mountainous", "scenic", "nature-focused", "hiking-access", "fresh-air", "peaceful"],
            ("location", "mountain"),
            &["hiking", "nature", "scenic-drives", "fresh-air", "mountain-activities"],
            (0.29, 0.26, 4100.0),
        ),
        concept(
            "lake",
            "Lake",
            &["lake", "water", "freshwater", "scenic", "peaceful", "fishing", "boating"],
            &["freshwater", "scenic", "peaceful", "recreational", "fishing-access", "boating"],
            ("location", "lakefront"),
            &["fishing", "boating", "peaceful", "water-activities", "scenic-relaxation"],
            (0.24, 0.19, 2800.0),
        ),
        concept(
            "ski",
            "Ski",
            &["ski", "snow", "winter", "slopes", "alpine", "mountain", "winter-sports"],
            &["winter", "snow-dependent", "sporty", "seasonal", "mountain-access", "equipment-needed"],
            ("activity", "winter-sports"),
            &["winter", "skiing", "snow-sports", "mountain-vacation", "winter-activities"],
            (0.52, 0.48, 3600.0),
        ),
        concept(
            "wine-country",
            "Wine Country",
            &["wine", "vineyard", "tasting", "culinary", "gourmet", "sophisticated", "scenic"],
            &["wine-focused", "culinary", "sophisticated", "scenic", "tasting-available", "gourmet"],
            ("experience", "culinary"),
            &["wine-tasting", "culinary", "romantic", "sophisticated", "gourmet-experience"],
            (0.36, 0.41, 2200.0),
        ),
        concept(
            "historic-cultural",
            "Historic & Cultural",
            &["historic", "cultural", "heritage", "museum", "architecture", "traditional", "educational"],
            &["historic", "cultural", "educational", "heritage-focused", "architectural", "traditional"],
            ("experience", "cultural"),
            &["cultural-tourism", "education", "history", "architecture", "heritage-sites"],
            (0.21, 0.17, 1800.0),
        ),
        concept(
            "all-inclusive",
            "All-Inclusive",
            &["all-inclusive", "comprehensive", "package", "meals", "drinks", "activities", "convenience"],
            &["comprehensive", "convenient", "package-deal", "meals-included", "activities-included"],
            ("package", "all-inclusive"),
            &["convenience", "package-vacation", "worry-free", "comprehensive-experience"],
            (0.33, 0.29, 5400.0),
        ),
        concept(
            "budget-friendly",
            "Budget-Friendly",
            &["budget", "affordable", "economical", "value", "cost-effective", "savings", "deal"],
            &["affordable", "economical", "value-focused", "cost-effective", "budget-conscious"],
            ("pricing", "budget"),
            &["budget-travel", "value-seeking", "cost-conscious", "economical-choice"],
            (0.15, 0.08, 7200.0),
        ),
        concept(
            "cabins",
            "Cabins",
            &["cabin", "rustic", "cozy", "nature", "retreat", "secluded", "peaceful"],
            &["rustic", "cozy", "nature-focused", "secluded", "peaceful", "retreat-like"],
            ("accommodation", "cabin"),
            &["nature-retreat", "peaceful", "rustic-experience", "secluded-getaway"],
            (0.27, 0.23, 2600.0),
        ),
        concept(
            "homes",
            "Homes",
            &["home", "house", "residential", "private", "spacious", "family", "comfortable"],
            &["residential", "private", "spacious", "home-like", "comfortable", "family-suitable"],
            ("accommodation", "home"),
            &["family-groups", "extended-stays", "privacy", "home-comfort", "group-travel"],
            (0.31, 0.34, 4900.0),
        ),
        concept(
            "trending",
            "Trending",
            &["trending", "popular", "hot", "current", "fashionable", "in-demand", "sought-after"],
            &["popular", "current", "in-demand", "fashionable", "sought-after", "contemporary"],
            ("meta", "trending"),
            &["popular-destinations", "current-trends", "fashionable-travel", "sought-after"],
            (0.22, 0.19, 3200.0),
        ),
        concept(
            "pool-bar",
            "Pool Bar",
            &["bar", "drinks", "service", "amenity", "poolside", "refreshment", "hospitality"],
            &["wet", "outdoor", "service-oriented", "adult-focused", "seasonal", "staffed"],
            ("amenity", "food-beverage"),
            &["summer", "vacation", "adult-time", "socializing", "afternoon"],
            (0.19, 0.31, 3200.0),
        ),
        concept(
            "infinity-pool",
            "Infinity Pool",
            &["pool", "luxury", "infinity", "edge", "premium", "view", "architectural"],
            &["wet", "outdoor", "luxury", "premium", "architectural", "maintenance-intensive"],
            ("amenity", "water-feature"),
            &["luxury-travel", "honeymoon", "special-occasion", "photography", "relaxation"],
            (0.41, 0.52, 2100.0),
        ),
        concept(
            "heated-pool",
            "Heated Pool",
            &["pool", "heated", "warm", "temperature", "comfort", "year-round", "thermal"],
            &["wet", "heated", "year-round", "comfortable", "energy-intensive", "premium"],
            ("amenity", "water-feature"),
            &["winter", "year-round", "comfort", "therapeutic", "extended-season"],
            (0.28, 0.22, 1800.0),
        ),
        concept(
            "fitness-center",
            "Fitness Center",
            &["fitness", "gym", "exercise", "workout", "equipment", "health", "training"],
            &["indoor", "equipment-based", "active", "health-focused", "staffed", "membership"],
            ("wellness", "fitness"),
            &["morning", "health", "routine", "active-travel", "wellness"],
            (0.18, 0.15, 3100.0),
        ),
        concept(
            "yoga-classes",
            "Yoga Classes",
            &["yoga", "meditation", "mindfulness", "flexibility", "wellness", "classes", "instructor"],
            &["indoor", "group-activity", "wellness", "scheduled", "instructor-led", "mindful"],
            ("wellness", "fitness-class"),
            &["morning", "evening", "wellness", "mindfulness", "group-activity"],
            (0.22, 0.18, 2800.0),
        ),
        concept(
            "concierge-service",
            "Concierge Service",
            &["concierge", "service", "assistance", "luxury", "personal", "exclusive", "premium"],
            &["premium", "personalized", "exclusive", "service-oriented", "luxury", "staffed"],
            ("service", "luxury-service"),
            &["luxury-travel", "convenience", "personalized", "exclusive", "premium"],
            (0.45, 0.38, 1900.0),
        ),
        concept(
            "butler-service",
            "Butler Service",
            &["butler", "personal", "service", "luxury", "exclusive", "premium", "assistance"],
            &["premium", "personalized", "exclusive", "luxury", "private", "high-end"],
            ("service", "luxury-service"),
            &["luxury-travel", "exclusive", "personalized", "premium", "private"],
            (0.52, 0.48, 1200.0),
        ),
        concept(
            "private-dining",
            "Private Dining",
            &["dining", "private", "exclusive", "luxury", "restaurant", "culinary", "premium"],
            &["premium", "exclusive", "private", "culinary", "luxury", "intimate"],
            ("dining", "luxury-dining"),
            &["luxury-travel", "romantic", "exclusive", "special-occasion", "premium"],
            (0.38, 0.44, 2200.0),
        ),
        concept(
            "kids-club",
            "Kids Club",
            &["kids", "children", "family", "activities", "childcare", "entertainment", "supervised"],
            &["family-oriented", "supervised", "age-appropriate", "safe", "educational", "fun"],
            ("family", "childcare"),
            &["family-vacation", "children", "supervised", "activities", "parents-time"],
            (0.31, 0.26, 3800.0),
        ),
        concept(
            "family-pool",
            "Family Pool",
            &["pool", "family", "children", "safe", "shallow", "fun", "water"],
            &["family-oriented", "safe", "shallow", "supervised", "fun", "child-friendly"],
            ("amenity", "water-feature"),
            &["family-vacation", "children", "safe", "fun", "supervised"],
            (0.29, 0.24, 2900.0),
        ),
        concept(
            "playground",
            "Playground",
            &["playground", "children", "play", "equipment", "safe", "outdoor", "fun"],
            &["outdoor", "child-friendly", "safe", "equipment-based", "fun", "supervised"],
            ("family", "play-area"),
            &["family-vacation", "children", "outdoor", "play", "active"],
            (0.24, 0.19, 2100.0),
        ),
        concept(
            "meeting-rooms",
            "Meeting Rooms",
            &["meeting", "business", "conference", "professional", "corporate", "work", "presentation"],
            &["professional", "equipped", "business-oriented", "formal", "technology", "private"],
            ("business", "meeting-facility"),
            &["business-travel", "meetings", "corporate", "professional", "work"],
            (0.33, 0.29, 4100.0),
        ),
        concept(
            "conference-facilities",
            "Conference Facilities",
            &["conference", "meeting", "business", "large", "corporate", "event", "professional"],
            &["professional", "large-scale", "equipped", "business-oriented", "formal", "event"],
            ("business", "conference-facility"),
            &["business-travel", "conferences", "corporate", "events", "large-groups"],
            (0.41, 0.36, 2800.0),
        ),
        concept(
            "couples-spa",
            "Couples Spa",
            &["spa", "couples", "romantic", "together", "relaxation", "intimate", "wellness"],
            &["romantic", "couples-oriented", "intimate", "premium", "relaxing", "private"],
            ("wellness", "couples-treatment"),
            &["romantic", "couples", "honeymoon", "anniversary", "intimate"],
            (0.48, 0.52, 1800.0),
        ),
        concept(
            "private-beach",
            "Private Beach",
            &["beach", "private", "exclusive", "ocean", "sand", "romantic", "secluded"],
            &["outdoor", "private", "exclusive", "romantic", "natural", "secluded"],
            ("amenity", "beach-access"),
            &["romantic", "exclusive", "beach", "privacy", "luxury"],
            (0.44, 0.41, 2400.0),
        ),
        concept(
            "sunset-dining",
            "Sunset Dining",
            &["dining", "sunset", "romantic", "evening", "view", "atmosphere", "special"],
            &["romantic", "scenic", "evening", "atmospheric", "special", "outdoor"],
            ("dining", "romantic-dining"),
            &["romantic", "evening", "special-occasion", "couples", "scenic"],
            (0.39, 0.43, 2100.0),
        ),
    ]
}

fn builtin_taxonomy() -> Vec<(&'static str, TaxonomyEntry)> {
    vec![
        (
            "pools",
            taxonomy(
                &["amenity", "water-feature"],
                &["pool-bar", "infinity-pool", "heated-pool"],
                &["hot-tub", "spa", "water-slide"],
                &["pool-maintenance", "lifeguard", "pool-towels"],
                &[],
            ),
        ),
        (
            "pool-bar",
            taxonomy(
                &["food-beverage-amenities"],
                &[],
                &["restaurant", "cafe", "room-service"],
                &[],
                &["swimming-pool", "outdoor-seating", "bar-seating"],
            ),
        ),
        (
            "infinity-pool",
            taxonomy(&["swimming-pool"], &[], &["heated-pool", "lap-pool"], &[], &[]),
        ),
        (
            "heated-pool",
            taxonomy(&["swimming-pool"], &[], &["infinity-pool", "lap-pool"], &[], &[]),
        ),
        (
            "wellness",
            taxonomy(
                &["experience", "health"],
                &["spa", "massage", "therapy"],
                &["fitness", "meditation", "yoga"],
                &["wellness-programs", "health-consultations", "relaxation-services"],
                &[],
            ),
        ),
        (
            "spa",
            taxonomy(
                &["wellness", "amenity"],
                &["massage", "facial", "body-treatment"],
                &["fitness-center", "pools", "sauna"],
                &["spa-treatments", "wellness-packages", "relaxation-therapy"],
                &[],
            ),
        ),
        (
            "luxury",
            taxonomy(
                &["experience", "premium"],
                &["luxury-amenities", "premium-services", "exclusive-access"],
                &["spa", "fine-dining", "concierge"],
                &["personal-butler", "luxury-transportation", "exclusive-experiences"],
                &[],
            ),
        ),
        (
            "family-friendly",
            taxonomy(
                &["experience", "amenity"],
                &["kids-club", "family-activities", "child-care"],
                &["entertainment", "recreation", "activities"],
                &["babysitting", "family-programs", "kids-activities"],
                &[],
            ),
        ),
        (
            "business",
            taxonomy(
                &["amenity", "service"],
                &["meeting-rooms", "business-center", "conference-facilities"],
                &["wifi", "workspace", "printing"],
                &["business-support", "meeting-planning", "av-equipment"],
                &[],
            ),
        ),
        (
            "beach",
            taxonomy(
                &["location", "natural-feature"],
                &["beach-access", "water-sports", "beachfront"],
                &["oceanview", "coastal", "waterfront"],
                &["beach-equipment", "water-activities", "beach-service"],
                &[],
            ),
        ),
    ]
}

fn builtin_behavioral() -> Vec<(&'static str, BehavioralProfile)> {
    vec![
        (
            "swimming-pool",
            BehavioralProfile {
                co_viewed_with: rates(&[("pool-bar", 0.34), ("infinity-pool", 0.28), ("heated-pool", 0.22)]),
                co_booked_with: rates(&[("pool-bar", 0.18), ("infinity-pool", 0.15), ("heated-pool", 0.12)]),
                session_duration_impact: 1.23,
            },
        ),
        (
            "pool-bar",
            BehavioralProfile {
                co_viewed_with: rates(&[("swimming-pool", 0.34), ("infinity-pool", 0.19), ("heated-pool", 0.14)]),
                co_booked_with: rates(&[("swimming-pool", 0.18), ("infinity-pool", 0.11), ("heated-pool", 0.08)]),
                session_duration_impact: 0.87,
            },
        ),
        (
            "infinity-pool",
            BehavioralProfile {
                co_viewed_with: rates(&[("swimming-pool", 0.28), ("pool-bar", 0.19), ("heated-pool", 0.16)]),
                co_booked_with: rates(&[("swimming-pool", 0.15), ("pool-bar", 0.11), ("heated-pool", 0.09)]),
                session_duration_impact: 1.45,
            },
        ),
        (
            "heated-pool",
            BehavioralProfile {
                co_viewed_with: rates(&[("swimming-pool", 0.22), ("pool-bar", 0.14), ("infinity-pool", 0.16)]),
                co_booked_with: rates(&[("swimming-pool", 0.12), ("pool-bar", 0.08), ("infinity-pool", 0.09)]),
                session_duration_impact: 1.12,
            },
        ),
    ]
}

fn builtin_temporal() -> Vec<(&'static str, TemporalProfile)> {
    vec![
        (
            "swimming-pool",
            temporal([0.7, 1.0, 0.6, 0.3], [0.4, 1.0, 0.7, 0.2], 45.0, &["june", "july", "august"]),
        ),
        (
            "pool-bar",
            temporal(
                [0.6, 1.0, 0.5, 0.2],
                [0.2, 1.0, 0.9, 0.3],
                35.0,
                &["may", "june", "july", "august", "september"],
            ),
        ),
        (
            "infinity-pool",
            temporal(
                [0.8, 1.0, 0.7, 0.4],
                [0.6, 1.0, 0.8, 0.3],
                65.0,
                &["april", "may", "june", "july", "august", "september"],
            ),
        ),
        (
            "heated-pool",
            temporal(
                [0.9, 0.8, 1.0, 0.9],
                [0.7, 0.9, 1.0, 0.4],
                55.0,
                &["october", "november", "december", "january", "february", "march"],
            ),
        ),
    ]
}

pub(crate) fn builtin_knowledge_base() -> KnowledgeBase {
    let mut builder = KnowledgeBase::builder(ConceptNormalizer::with_builtin_aliases());
    for concept in builtin_concepts() {
        builder = builder.concept(concept);
    }
    for (id, entry) in builtin_taxonomy() {
        builder = builder.taxonomy(id, entry);
    }
    for (id, profile) in builtin_behavioral() {
        builder = builder.behavioral(id, profile);
    }
    for (id, profile) in builtin_temporal() {
        builder = builder.temporal(id, profile);
    }
    builder.build()
}
