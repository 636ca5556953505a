//! Pattern catalog models.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::normalized_phrase;
use crate::knowledge::KnowledgeError;
use crate::resolver::normalize;

/// A trigger expression compiled for case-insensitive matching.
///
/// The source text is kept alongside the compiled regex because the fuzzy
/// stages compare the query against the raw expression string.
#[derive(Debug, Clone)]
pub struct Trigger {
    pattern: String,
    folded: String,
    regex: Regex,
}

impl Trigger {
    /// Compile a trigger expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            pattern: pattern.to_string(),
            folded: pattern.to_lowercase(),
            regex,
        })
    }

    /// The expression as written in the catalog.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Lower-cased expression text, used for string-distance comparison.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Test the expression against normalized text.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Trigger {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Serialize for Trigger {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

/// One resolvable intent.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PatternEntry {
    /// Intent identifier (e.g., "art_patients")
    pub intent: String,
    /// Trigger expressions, tested in order
    pub triggers: Vec<Trigger>,
    /// Downstream operation name (e.g., "getARTPatients")
    pub handler: String,
}

impl PatternEntry {
    /// Create an entry, compiling each trigger expression.
    pub fn new(intent: &str, patterns: &[&str], handler: &str) -> Result<Self, KnowledgeError> {
        if handler.trim().is_empty() {
            return Err(KnowledgeError::EmptyHandler(intent.to_string()));
        }
        if patterns.is_empty() {
            return Err(KnowledgeError::EmptyTriggers(intent.to_string()));
        }

        let triggers = patterns
            .iter()
            .map(|p| {
                Trigger::new(p).map_err(|source| KnowledgeError::InvalidTrigger {
                    intent: intent.to_string(),
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            intent: intent.to_string(),
            triggers,
            handler: handler.to_string(),
        })
    }

    /// First trigger that matches the text, if any.
    pub fn matching_trigger(&self, text: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.is_match(text))
    }
}

/// The ordered set of intents shared by every matching strategy.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct PatternCatalog {
    entries: Vec<PatternEntry>,
}

impl PatternCatalog {
    /// Build a catalog, rejecting duplicate intent ids.
    pub fn new(entries: Vec<PatternEntry>) -> Result<Self, KnowledgeError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.intent == entry.intent) {
                return Err(KnowledgeError::DuplicateIntent(entry.intent.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// First entry (catalog order, then trigger order) whose trigger matches the text.
    pub fn find_exact(&self, text: &str) -> Option<(&PatternEntry, &Trigger)> {
        if text.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find_map(|entry| entry.matching_trigger(text).map(|t| (entry, t)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A common mis-phrasing and the canonical phrase it stands for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionEntry {
    #[serde(deserialize_with = "normalized_phrase")]
    pub wrong: String,
    #[serde(deserialize_with = "normalized_phrase")]
    pub correct: String,
}

impl CorrectionEntry {
    pub fn new(wrong: &str, correct: &str) -> Self {
        Self {
            wrong: normalize(wrong),
            correct: normalize(correct),
        }
    }
}

/// Fixed lookup table of corrections. Never updated at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CorrectionTable {
    entries: Vec<CorrectionEntry>,
}

impl CorrectionTable {
    pub fn new(entries: Vec<CorrectionEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorrectionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A domain keyword and the example queries offered when a user's word resembles it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionTopic {
    #[serde(deserialize_with = "normalized_phrase")]
    pub keyword: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl SuggestionTopic {
    pub fn new(keyword: &str, suggestions: &[&str]) -> Self {
        Self {
            keyword: normalize(keyword),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}
