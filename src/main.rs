use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use concept_affinity::generation::{ConceptRef, GenerationRequest, Surface};
use concept_affinity::similarity::engine::ALL_DIMENSIONS;
use concept_affinity::{
    assign_roles, Catalog, ContentOrchestrator, EngineConfig, Evidence, KnowledgeBase,
    SimilarityEngine,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "affinity")]
#[command(about = "Concept similarity scoring and content generation for travel listings")]
struct Args {
    /// JSON knowledge base snapshot (default: built-in tables, or AFFINITY_KB_PATH)
    #[arg(long, global = true)]
    kb: Option<PathBuf>,

    /// JSON engine config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score one concept pair
    Similarity {
        primary: String,
        other: String,

        /// Dimension name, or "all" for the weighted aggregate
        #[arg(short, long, default_value = ALL_DIMENSIONS)]
        dimension: String,
    },

    /// Score candidates against a primary concept and assign roles
    Rank {
        primary: String,

        /// Candidate IDs (default: every other catalog concept)
        candidates: Vec<String>,

        #[arg(short, long, default_value = ALL_DIMENSIONS)]
        dimension: String,

        /// Concepts kept as secondary/tertiary
        #[arg(long, default_value_t = 3)]
        top_n: usize,

        /// JSON catalog of selectable concepts
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Generate marketing copy variants
    Generate {
        /// Primary concept ID
        primary: String,

        /// Further concepts in role order (secondary first)
        #[arg(short, long = "concept")]
        concepts: Vec<String>,

        #[arg(short, long, default_value = "Luxury")]
        tone: String,

        /// pdp, srp, email or social
        #[arg(short, long, default_value = "pdp")]
        surface: String,

        /// Evidence sentence (repeatable)
        #[arg(short, long = "evidence")]
        evidence: Vec<String>,

        /// JSON array of evidence strings or objects
        #[arg(long)]
        evidence_file: Option<PathBuf>,

        /// Token override as KEY=VALUE (repeatable)
        #[arg(long = "token")]
        tokens: Vec<String>,

        #[arg(long, default_value = "en-US")]
        language: String,
    },

    /// List knowledge base concepts
    Concepts {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        search: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn warn_unknown(kb: &KnowledgeBase, id: &str) {
    if kb.contains(id) {
        return;
    }
    match kb.suggest(id) {
        Some(suggestion) => warn!("Unknown concept '{}', did you mean '{}'?", id, suggestion),
        None => warn!("Unknown concept '{}'", id),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::from_env()?,
    };
    let kb = match args.kb.as_ref().or(config.knowledge_base_path.as_ref()) {
        Some(path) => KnowledgeBase::load(path)?,
        None => KnowledgeBase::builtin(),
    };
    info!("Knowledge base ready ({} concepts)", kb.len());
    let kb = Arc::new(kb);

    match args.command {
        Command::Similarity {
            primary,
            other,
            dimension,
        } => {
            warn_unknown(&kb, &primary);
            warn_unknown(&kb, &other);
            let engine = SimilarityEngine::new(kb.clone());
            print_json(&engine.similarity(&primary, &other, &dimension))?;
        }

        Command::Rank {
            primary,
            candidates,
            dimension,
            top_n,
            catalog,
        } => {
            warn_unknown(&kb, &primary);
            let candidates = if candidates.is_empty() {
                let catalog = match catalog {
                    Some(path) => Catalog::load(&path)?,
                    None => Catalog::from_knowledge_base(&kb),
                };
                catalog.candidate_ids(&kb.normalize(&primary))
            } else {
                candidates
            };
            for id in &candidates {
                warn_unknown(&kb, id);
            }

            let engine = SimilarityEngine::new(kb.clone());
            let ranked = engine.batch_similarity(&primary, &candidates, &dimension);
            let roles = assign_roles(&primary, &ranked, top_n);
            print_json(&serde_json::json!({
                "primary": primary,
                "dimension": dimension,
                "ranked": ranked,
                "roles": roles,
            }))?;
        }

        Command::Generate {
            primary,
            concepts,
            tone,
            surface,
            evidence,
            evidence_file,
            tokens,
            language,
        } => {
            let surface: Surface = surface.parse()?;
            let concept_ref = |id: &str| {
                warn_unknown(&kb, id);
                ConceptRef::new(kb.normalize(id), kb.display_name(id))
            };

            let mut request = GenerationRequest::new(concept_ref(&primary), &tone, surface)
                .with_language(&language);
            for id in &concepts {
                request = request.with_concept(concept_ref(id));
            }
            for text in evidence {
                request = request.with_evidence(Evidence::new(text));
            }
            if let Some(path) = evidence_file {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read evidence file {:?}", path))?;
                let values: Vec<serde_json::Value> = serde_json::from_str(&content)
                    .with_context(|| format!("Evidence file {:?} is not a JSON array", path))?;
                for item in Evidence::from_values(&values) {
                    request = request.with_evidence(item);
                }
            }
            for token in &tokens {
                let Some((key, value)) = token.split_once('=') else {
                    bail!("Token override '{}' must be KEY=VALUE", token);
                };
                request = request.with_token(key.trim(), value.trim());
            }

            let orchestrator = ContentOrchestrator::from_config(&config)?;
            match orchestrator.generate(&request).await {
                Ok(outcome) => print_json(&outcome)?,
                Err(err) => {
                    print_json(&serde_json::json!({
                        "success": false,
                        "error": err.to_string(),
                        "tips": &err.tips,
                    }))?;
                    bail!("Generation failed: {}", err);
                }
            }
        }

        Command::Concepts { category, search } => {
            let catalog = Catalog::from_knowledge_base(&kb);
            let entries = match (&category, &search) {
                (Some(category), _) => catalog.in_category(category),
                (None, Some(query)) => catalog.search(query),
                (None, None) => catalog.entries.iter().collect(),
            };
            print_json(&entries)?;
        }
    }

    Ok(())
}
