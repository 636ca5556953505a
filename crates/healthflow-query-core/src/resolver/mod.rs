//! Query resolver.
//!
//! Pipeline: Normalization → Matching → Filter Extraction → Resolution Policy

mod dates;
mod filters;
mod matcher;
mod normalizer;
mod policy;
mod similarity;
mod suggest;

pub use dates::*;
pub use filters::*;
pub use matcher::*;
pub use normalizer::*;
pub use policy::*;
pub use similarity::*;
pub use suggest::*;

use chrono::NaiveDate;

use crate::config::ResolverConfig;
use crate::knowledge::{KnowledgeBase, BUILTIN_CORRECTIONS, BUILTIN_SUGGESTION_TOPICS};
use crate::models::{Lexicon, PatternCatalog, Resolution, SemanticGraph};

/// Main resolver that coordinates the full pipeline.
///
/// Borrows the knowledge it reads; one instance can serve any number of
/// threads. The date relative filters are anchored to is fixed when the
/// resolver is built (the configured reference date, else the local calendar
/// date at that moment), so `resolve` depends only on its input. Build a new
/// resolver per request or per day if "today" should advance.
pub struct Resolver<'a> {
    matcher: Matcher<'a>,
    suggester: SuggestionGenerator<'a>,
    config: ResolverConfig,
    today: NaiveDate,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with default thresholds.
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self::with_config(kb, ResolverConfig::default())
    }

    pub fn with_config(kb: &'a KnowledgeBase, config: ResolverConfig) -> Self {
        Self {
            matcher: Matcher::new(&kb.catalog, &kb.graph, &kb.corrections, config.thresholds),
            suggester: SuggestionGenerator::new(
                &kb.suggestion_topics,
                &kb.lexicon,
                config.thresholds.suggestion_accept,
                config.max_suggestions,
            ),
            today: config.today(),
            config,
        }
    }

    /// Resolver over caller-owned catalog, lexicon and graph, with the
    /// built-in correction table and suggestion vocabulary.
    pub fn from_parts(
        catalog: &'a PatternCatalog,
        lexicon: &'a Lexicon,
        graph: &'a SemanticGraph,
    ) -> Self {
        let config = ResolverConfig::default();
        Self {
            matcher: Matcher::new(catalog, graph, &BUILTIN_CORRECTIONS, config.thresholds),
            suggester: SuggestionGenerator::new(
                &BUILTIN_SUGGESTION_TOPICS,
                lexicon,
                config.thresholds.suggestion_accept,
                config.max_suggestions,
            ),
            today: config.today(),
            config,
        }
    }

    /// Resolve one free-text query.
    pub fn resolve(&self, query: &str) -> Resolution {
        tracing::trace!(query, "Resolving query");

        // Step 1: Normalize
        let normalized = normalize(query);

        // Step 2: Run the matching stages
        let candidate = self.matcher.find_best_match(&normalized);

        // Step 3: Filters are independent of which stage fired
        let filters = extract_filters(&normalized, self.today);

        // Step 4: Decide how to act on the candidate
        let resolution = decide(candidate, filters, || self.suggester.suggest(&normalized));

        tracing::debug!(
            mode = ?resolution.mode,
            handler = resolution.handler_id.as_deref().unwrap_or_default(),
            confidence = resolution.confidence,
            filters = resolution.filters.len(),
            "Query resolved"
        );
        resolution
    }

    /// Resolve a batch of queries.
    pub fn resolve_all<S: AsRef<str>>(&self, queries: &[S]) -> Vec<Resolution> {
        queries.iter().map(|q| self.resolve(q.as_ref())).collect()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}
