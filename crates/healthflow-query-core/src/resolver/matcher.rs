//! Layered intent matching.
//!
//! Stages run in a fixed order and the pipeline stops at the first one that
//! produces a candidate:
//!
//! 1. Exact: trigger regex test, confidence 1.0
//! 2. Fuzzy: edit-distance against every trigger string
//! 3. Conceptual: edit-distance against situation key phrases, then an exact
//!    lookup of the situation's related queries
//! 4. Learned correction: edit-distance against known mis-phrasings, then an
//!    exact lookup of the corrected phrase
//!
//! The fuzzy stage is O(triggers × len²). That is fine for a catalog of a few
//! dozen entries; larger catalogs need a pre-filter before this scan.

use crate::config::MatchThresholds;
use crate::models::{
    CorrectionTable, MatchCandidate, PatternCatalog, PatternEntry, SemanticGraph,
    SituationContext, Trigger,
};

use super::normalizer::normalize;
use super::similarity::{best_match, similarity};

/// Ceiling for inexact confidences so 1.0 stays reserved for exact matches.
///
/// Only reachable when a query spells out a trigger expression that does not
/// match its own source text (e.g. `\bpid\d+`).
const MAX_INEXACT_CONFIDENCE: f64 = 0.99;

/// Runs the matching stages over one normalized query.
pub struct Matcher<'a> {
    catalog: &'a PatternCatalog,
    graph: &'a SemanticGraph,
    corrections: &'a CorrectionTable,
    thresholds: MatchThresholds,
}

impl<'a> Matcher<'a> {
    pub fn new(
        catalog: &'a PatternCatalog,
        graph: &'a SemanticGraph,
        corrections: &'a CorrectionTable,
        thresholds: MatchThresholds,
    ) -> Self {
        Self {
            catalog,
            graph,
            corrections,
            thresholds,
        }
    }

    /// Run all stages in order, returning the first candidate produced.
    pub fn find_best_match(&self, query: &str) -> MatchCandidate {
        if query.is_empty() {
            return MatchCandidate::None;
        }

        let stages: [(&str, fn(&Self, &str) -> Option<MatchCandidate>); 4] = [
            ("exact", Self::exact),
            ("fuzzy", Self::fuzzy),
            ("conceptual", Self::conceptual),
            ("learned_correction", Self::learned_correction),
        ];

        for (stage, run) in stages {
            if let Some(candidate) = run(self, query) {
                tracing::debug!(
                    stage,
                    intent = candidate.intent().unwrap_or_default(),
                    confidence = candidate.confidence(),
                    "Query matched"
                );
                return candidate;
            }
        }

        tracing::debug!("No matching stage cleared its threshold");
        MatchCandidate::None
    }

    /// Stage 1: first trigger (catalog order, then trigger order) that matches.
    pub fn exact(&self, query: &str) -> Option<MatchCandidate> {
        let (entry, trigger) = self.catalog.find_exact(query)?;
        Some(MatchCandidate::Exact {
            intent: entry.intent.clone(),
            handler: entry.handler.clone(),
            trigger: trigger.pattern().to_string(),
        })
    }

    /// Stage 2: the trigger string closest to the whole query.
    pub fn fuzzy(&self, query: &str) -> Option<MatchCandidate> {
        let triggers: Vec<(&PatternEntry, &Trigger)> = self
            .catalog
            .iter()
            .flat_map(|entry| entry.triggers.iter().map(move |t| (entry, t)))
            .collect();

        let (index, score) = best_match(query, triggers.iter().map(|(_, t)| t.folded()))?;
        if score <= self.thresholds.fuzzy_accept {
            return None;
        }

        let (entry, trigger) = triggers[index];
        let suggestion = (score > self.thresholds.fuzzy_suggest && score < 1.0)
            .then(|| format!("Did you mean: \"{}\"?", trigger.folded()));

        Some(MatchCandidate::Fuzzy {
            intent: entry.intent.clone(),
            handler: entry.handler.clone(),
            confidence: score.min(MAX_INEXACT_CONFIDENCE),
            suggestion,
        })
    }

    /// Stage 3: a situation close to the query whose related query resolves.
    pub fn conceptual(&self, query: &str) -> Option<MatchCandidate> {
        for node in self.graph.iter() {
            let situation_similarity = similarity(query, &node.key_phrase);
            if situation_similarity <= self.thresholds.conceptual_accept {
                continue;
            }

            let resolved = node
                .related_queries
                .iter()
                .find_map(|related| self.catalog.find_exact(&normalize(related)));

            if let Some((entry, _)) = resolved {
                return Some(MatchCandidate::Conceptual {
                    intent: entry.intent.clone(),
                    handler: entry.handler.clone(),
                    confidence: situation_similarity * self.thresholds.conceptual_discount,
                    situation_similarity,
                    context: SituationContext {
                        situation: node.key_phrase.clone(),
                        implications: node.implications.clone(),
                        suggested_actions: node.suggested_actions.clone(),
                    },
                });
            }
        }
        None
    }

    /// Stage 4: a known mis-phrasing close to the query whose correction resolves.
    pub fn learned_correction(&self, query: &str) -> Option<MatchCandidate> {
        self.corrections
            .iter()
            .filter(|c| similarity(query, &c.wrong) > self.thresholds.correction_accept)
            .find_map(|c| {
                let (entry, _) = self.catalog.find_exact(&normalize(&c.correct))?;
                Some(MatchCandidate::LearnedCorrection {
                    intent: entry.intent.clone(),
                    handler: entry.handler.clone(),
                    confidence: self.thresholds.correction_confidence,
                    corrected_to: c.correct.clone(),
                    suggestion: Some(format!("Did you mean: \"{}\"?", c.correct)),
                })
            })
    }
}
