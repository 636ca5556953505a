//! Lexicon and semantic graph models.

use serde::{Deserialize, Serialize};

use super::{normalized_phrase, normalized_phrases};
use crate::resolver::normalize;

/// A canonical healthcare concept with its spoken variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Concept {
    /// Canonical key (e.g., "viral_load")
    pub id: String,
    /// Surface forms that name this concept, normalized
    #[serde(deserialize_with = "normalized_phrases")]
    pub synonyms: Vec<String>,
    /// Ids or phrases of concepts commonly asked about alongside this one
    #[serde(default, deserialize_with = "normalized_phrases")]
    pub related: Vec<String>,
}

impl Concept {
    /// Create a concept with the given synonyms and no related topics.
    pub fn new(id: impl Into<String>, synonyms: &[&str]) -> Self {
        Self {
            id: id.into(),
            synonyms: synonyms.iter().map(|s| normalize(s)).collect(),
            related: Vec::new(),
        }
    }

    /// Attach related topics.
    pub fn with_related(mut self, related: &[&str]) -> Self {
        self.related = related.iter().map(|s| normalize(s)).collect();
        self
    }
}

/// The knowledge base of concepts, in load order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Lexicon {
    concepts: Vec<Concept>,
}

impl Lexicon {
    pub fn new(concepts: Vec<Concept>) -> Self {
        Self { concepts }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

/// A compound clinical or operational situation and what it implies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SituationNode {
    /// Phrase the situation is recognised by (e.g., "high viral load")
    #[serde(deserialize_with = "normalized_phrase")]
    pub key_phrase: String,
    /// Likely consequences, most important first
    pub implications: Vec<String>,
    /// Recommended follow-up actions
    pub suggested_actions: Vec<String>,
    /// Query phrases to try against the pattern catalog, in preference order
    pub related_queries: Vec<String>,
}

impl SituationNode {
    pub fn new(
        key_phrase: &str,
        implications: &[&str],
        suggested_actions: &[&str],
        related_queries: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            key_phrase: normalize(key_phrase),
            implications: owned(implications),
            suggested_actions: owned(suggested_actions),
            related_queries: owned(related_queries),
        }
    }
}

/// Situations in evaluation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SemanticGraph {
    nodes: Vec<SituationNode>,
}

impl SemanticGraph {
    pub fn new(nodes: Vec<SituationNode>) -> Self {
        Self { nodes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SituationNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
