//! HealthFlow Query Core
//!
//! Deterministic resolver that maps a free-text clinic question onto one of a
//! fixed set of query handlers, plus the filters to run it with.
//!
//! # Architecture
//!
//! ```text
//! Query text → Normalization ─┬─→ Matcher ──────────────→ MatchCandidate
//!                             │    1. Exact       (1.0)          │
//!                             │    2. Fuzzy       (> 0.7)        │
//!                             │    3. Conceptual  (> 0.6 × 0.9)  │
//!                             │    4. Learned     (0.75)         │
//!                             │                                  │
//!                             └─→ Filter Extractor ──→ Filters   │
//!                                                        │       │
//!                                             ┌──────────▼───────▼──────┐
//!                                             │    Resolution Policy    │
//!                                             └────────────┬────────────┘
//!                                                          │
//!                     ┌───────────────┬────────────────────┼───────────────┐
//!                     ▼               ▼                    ▼               ▼
//!                   auto           confirm            contextual        reject
//!               (run handler)  (ask the user)   (run + explain why)  (suggest)
//! ```
//!
//! # Core Principle
//!
//! **Only exact matches run unasked.** Fuzzy and learned matches always go
//! back to the user; conceptual matches run but say what they inferred.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatternCatalog, SemanticGraph, Resolution, etc.)
//! - [`knowledge`]: Knowledge base loading and the built-in healthcare data set
//! - [`config`]: Tunable thresholds and the reference date
//! - [`resolver`]: Matching pipeline, filter extraction and resolution policy

pub mod config;
pub mod knowledge;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use config::{ConfigError, MatchThresholds, ResolverConfig};
pub use knowledge::{KnowledgeBase, KnowledgeError};
pub use models::{
    ExecutionMode, FilterKey, Filters, Lexicon, MatchCandidate, PatternCatalog, PatternEntry,
    Resolution, SemanticGraph, SituationContext, Strategy,
};
pub use resolver::Resolver;

/// Resolve one query against caller-owned knowledge with default settings.
///
/// Uses the built-in correction table and suggestion vocabulary.
pub fn resolve(
    query: &str,
    catalog: &PatternCatalog,
    lexicon: &Lexicon,
    graph: &SemanticGraph,
) -> Resolution {
    Resolver::from_parts(catalog, lexicon, graph).resolve(query)
}
