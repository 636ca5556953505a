//! Static knowledge loaded once at startup: pattern catalog, lexicon,
//! semantic graph, correction table and suggestion vocabulary.
//!
//! Everything here is immutable after construction and can be shared
//! across threads by reference.

mod builtin;

pub use builtin::*;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    CorrectionEntry, CorrectionTable, Lexicon, PatternCatalog, PatternEntry, SemanticGraph,
    SuggestionTopic,
};

/// Load-time validation errors.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid trigger {pattern:?} for intent {intent}: {source}")]
    InvalidTrigger {
        intent: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Intent {0} has an empty handler id")]
    EmptyHandler(String),

    #[error("Intent {0} has no trigger expressions")]
    EmptyTriggers(String),

    #[error("Duplicate intent: {0}")]
    DuplicateIntent(String),

    #[error("Correction {wrong:?} -> {correct:?} does not resolve in the catalog")]
    UnresolvableCorrection { wrong: String, correct: String },
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Everything the resolver reads, bundled.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub catalog: PatternCatalog,
    pub lexicon: Lexicon,
    pub graph: SemanticGraph,
    pub corrections: CorrectionTable,
    pub suggestion_topics: Vec<SuggestionTopic>,
}

/// Catalog entry as stored in configuration, before trigger compilation.
#[derive(Debug, Deserialize)]
struct RawPatternEntry {
    intent: String,
    triggers: Vec<String>,
    handler: String,
}

#[derive(Debug, Deserialize)]
struct RawKnowledgeBase {
    patterns: Vec<RawPatternEntry>,
    #[serde(default)]
    concepts: Lexicon,
    #[serde(default)]
    situations: SemanticGraph,
    #[serde(default)]
    corrections: CorrectionTable,
    #[serde(default)]
    suggestion_topics: Vec<SuggestionTopic>,
}

impl KnowledgeBase {
    /// Assemble and validate a knowledge base.
    pub fn new(
        catalog: PatternCatalog,
        lexicon: Lexicon,
        graph: SemanticGraph,
        corrections: CorrectionTable,
        suggestion_topics: Vec<SuggestionTopic>,
    ) -> KnowledgeResult<Self> {
        let kb = Self {
            catalog,
            lexicon,
            graph,
            corrections,
            suggestion_topics,
        };
        kb.validate()?;
        Ok(kb)
    }

    /// Load from the application's JSON configuration.
    ///
    /// ```json
    /// {
    ///   "patterns": [{"intent": "diabetes", "triggers": ["diabetes"], "handler": "getDiabetesPatients"}],
    ///   "concepts": [{"id": "diabetes", "synonyms": ["dm"], "related": ["insulin"]}],
    ///   "situations": [],
    ///   "corrections": [{"wrong": "sugar test", "correct": "diabetes"}],
    ///   "suggestion_topics": []
    /// }
    /// ```
    pub fn from_json(json: &str) -> KnowledgeResult<Self> {
        let raw: RawKnowledgeBase = serde_json::from_str(json)?;

        let entries = raw
            .patterns
            .iter()
            .map(|p| {
                let triggers: Vec<&str> = p.triggers.iter().map(String::as_str).collect();
                PatternEntry::new(&p.intent, &triggers, &p.handler)
            })
            .collect::<KnowledgeResult<Vec<_>>>()
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected pattern catalog"))?;

        Self::new(
            PatternCatalog::new(entries)?,
            raw.concepts,
            raw.situations,
            raw.corrections,
            raw.suggestion_topics,
        )
    }

    /// The healthcare data set the clinic chatbot ships with.
    pub fn builtin() -> Self {
        Self::new(
            builtin_catalog(),
            builtin_lexicon(),
            builtin_graph(),
            builtin_corrections(),
            builtin_suggestion_topics(),
        )
        .expect("Built-in knowledge base failed validation")
    }

    /// Every correction must land on a catalog entry, otherwise the
    /// learned-correction stage could never fire for it.
    fn validate(&self) -> KnowledgeResult<()> {
        for CorrectionEntry { wrong, correct } in self.corrections.iter() {
            if self.catalog.find_exact(correct).is_none() {
                let err = KnowledgeError::UnresolvableCorrection {
                    wrong: wrong.clone(),
                    correct: correct.clone(),
                };
                tracing::warn!(error = %err, "Rejected correction table");
                return Err(err);
            }
        }
        Ok(())
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_KB: &str = r#"{
        "patterns": [
            {"intent": "diabetes", "triggers": ["diabetes", "glucose"], "handler": "getDiabetesPatients"},
            {"intent": "art_patients", "triggers": ["art.*patient"], "handler": "getARTPatients"}
        ],
        "concepts": [
            {"id": "diabetes", "synonyms": ["diabetes", "dm"], "related": ["insulin"]}
        ],
        "situations": [
            {
                "key_phrase": "uncontrolled diabetes",
                "implications": ["complications risk"],
                "suggested_actions": ["medication review"],
                "related_queries": ["diabetes monitoring"]
            }
        ],
        "corrections": [{"wrong": "sugar test", "correct": "glucose"}]
    }"#;

    #[test]
    fn test_builtin_is_valid() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.validate().is_ok());
        assert!(!kb.catalog.is_empty());
        assert!(!kb.lexicon.is_empty());
        assert!(!kb.graph.is_empty());
        assert_eq!(kb.corrections.len(), 5);
    }

    #[test]
    fn test_from_json() {
        let kb = KnowledgeBase::from_json(SMALL_KB).unwrap();

        assert_eq!(kb.catalog.len(), 2);
        assert_eq!(kb.lexicon.len(), 1);
        assert_eq!(kb.graph.len(), 1);
        assert_eq!(kb.corrections.len(), 1);
        assert!(kb.suggestion_topics.is_empty());

        let (entry, _) = kb.catalog.find_exact("art patients").unwrap();
        assert_eq!(entry.handler, "getARTPatients");
    }

    #[test]
    fn test_from_json_normalizes_phrase_case() {
        use crate::models::{ExecutionMode, Strategy};
        use crate::resolver::Resolver;

        let json = r#"{
            "patterns": [
                {"intent": "high_viral_load", "triggers": ["virological failure"], "handler": "getHighViralLoadPatients"},
                {"intent": "due_viral_load", "triggers": ["due.*viral"], "handler": "getDueForViralLoadTest"}
            ],
            "situations": [
                {
                    "key_phrase": "HIGH VIRAL LOAD",
                    "implications": ["Treatment failure"],
                    "suggested_actions": [],
                    "related_queries": ["Virological Failure"]
                }
            ],
            "corrections": [{"wrong": "VIRAL LOAD TEST", "correct": "Due Viral Load"}],
            "suggestion_topics": [{"keyword": "VIRAL", "suggestions": ["viral load"]}]
        }"#;
        let kb = KnowledgeBase::from_json(json).unwrap();
        let resolver = Resolver::new(&kb);

        let situation = resolver.resolve("high viral load");
        assert_eq!(situation.mode, ExecutionMode::Contextual);
        assert_eq!(situation.handler_id.as_deref(), Some("getHighViralLoadPatients"));
        assert!((situation.confidence - 0.9).abs() < 1e-9);

        let corrected = resolver.resolve("viral load tset");
        assert_eq!(corrected.mode, ExecutionMode::Confirm);
        assert_eq!(corrected.candidate.strategy(), Some(Strategy::LearnedCorrection));
        assert_eq!(corrected.handler_id.as_deref(), Some("getDueForViralLoadTest"));

        let rejected = resolver.resolve("virals zzz");
        assert_eq!(rejected.mode, ExecutionMode::Reject);
        assert_eq!(
            rejected.message.as_deref(),
            Some("I'm not sure about that. Try: \"viral load\"")
        );
    }

    #[test]
    fn test_new_rejects_unresolvable_correction() {
        let kb = KnowledgeBase::builtin();
        let result = KnowledgeBase::new(
            kb.catalog,
            kb.lexicon,
            kb.graph,
            CorrectionTable::new(vec![CorrectionEntry::new("sugar test", "nothing here")]),
            kb.suggestion_topics,
        );

        assert!(matches!(
            result,
            Err(KnowledgeError::UnresolvableCorrection { ref correct, .. }) if correct == "nothing here"
        ));
    }

    #[test]
    fn test_from_json_invalid_regex() {
        let json = r#"{"patterns": [{"intent": "bad", "triggers": ["[a-"], "handler": "getBad"}]}"#;
        let err = KnowledgeBase::from_json(json).unwrap_err();

        assert!(matches!(err, KnowledgeError::InvalidTrigger { ref intent, .. } if intent == "bad"));
    }

    #[test]
    fn test_from_json_unresolvable_correction() {
        let json = r#"{
            "patterns": [{"intent": "diabetes", "triggers": ["diabetes"], "handler": "getDiabetesPatients"}],
            "corrections": [{"wrong": "cd4 test", "correct": "due cd4"}]
        }"#;

        assert!(matches!(
            KnowledgeBase::from_json(json),
            Err(KnowledgeError::UnresolvableCorrection { .. })
        ));
    }

    #[test]
    fn test_from_json_duplicate_intent() {
        let json = r#"{"patterns": [
            {"intent": "a", "triggers": ["x"], "handler": "getA"},
            {"intent": "a", "triggers": ["y"], "handler": "getA"}
        ]}"#;

        assert!(matches!(
            KnowledgeBase::from_json(json),
            Err(KnowledgeError::DuplicateIntent(_))
        ));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            KnowledgeBase::from_json("[]"),
            Err(KnowledgeError::Json(_))
        ));
    }
}
