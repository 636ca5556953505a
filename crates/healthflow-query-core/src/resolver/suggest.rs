//! Fallback suggestions for queries no matching stage could place.

use crate::models::{Lexicon, SuggestionTopic};

use super::normalizer::tokenize;
use super::similarity::similarity;

/// Shown when neither the topic vocabulary nor the lexicon recognises a token.
pub const GENERIC_SUGGESTION: &str = "I didn't understand that. Try asking about:\n\
- Patients on ART\n\
- High viral loads\n\
- Appointments\n\
- Medications due";

/// Builds the message attached to a rejected resolution.
pub struct SuggestionGenerator<'a> {
    topics: &'a [SuggestionTopic],
    lexicon: &'a Lexicon,
    accept: f64,
    max_suggestions: usize,
}

impl<'a> SuggestionGenerator<'a> {
    pub fn new(
        topics: &'a [SuggestionTopic],
        lexicon: &'a Lexicon,
        accept: f64,
        max_suggestions: usize,
    ) -> Self {
        Self {
            topics,
            lexicon,
            accept,
            max_suggestions,
        }
    }

    /// Suggestion text for a normalized query. Never empty.
    pub fn suggest(&self, query: &str) -> String {
        if let Some(message) = self.from_topics(query) {
            return message;
        }
        if let Some(message) = self.from_lexicon(query) {
            return message;
        }
        GENERIC_SUGGESTION.to_string()
    }

    /// Topic keywords close to any token, in token order.
    fn from_topics(&self, query: &str) -> Option<String> {
        let mut suggestions: Vec<&str> = Vec::new();

        for token in tokenize(query) {
            for topic in self.topics {
                if similarity(token, &topic.keyword) <= self.accept {
                    continue;
                }
                for suggestion in &topic.suggestions {
                    if !suggestions.contains(&suggestion.as_str()) {
                        suggestions.push(suggestion);
                    }
                }
            }
        }

        if suggestions.is_empty() {
            return None;
        }

        let quoted: Vec<String> = suggestions
            .iter()
            .take(self.max_suggestions)
            .map(|s| format!("\"{}\"", s))
            .collect();
        Some(format!("I'm not sure about that. Try: {}", quoted.join(" or ")))
    }

    /// First concept with a synonym close to any token.
    fn from_lexicon(&self, query: &str) -> Option<String> {
        let concept = tokenize(query).find_map(|token| {
            self.lexicon.iter().find(|concept| {
                concept
                    .synonyms
                    .iter()
                    .any(|synonym| similarity(token, synonym) >= self.accept)
            })
        })?;

        let topic = concept.id.replace('_', " ");
        Some(match concept.related.first() {
            Some(related) => format!("Try asking about {} or {}", topic, related),
            None => format!("Try asking about {}", topic),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{builtin_lexicon, builtin_suggestion_topics};
    use crate::models::Concept;

    fn suggest(query: &str) -> String {
        let topics = builtin_suggestion_topics();
        let lexicon = builtin_lexicon();
        SuggestionGenerator::new(&topics, &lexicon, 0.7, 2).suggest(query)
    }

    #[test]
    fn test_topic_suggestions() {
        assert_eq!(
            suggest("virals zzz"),
            "I'm not sure about that. Try: \"viral load\" or \"high viral load\""
        );
    }

    #[test]
    fn test_topic_suggestions_are_capped_and_deduplicated() {
        assert_eq!(
            suggest("cd4 cd4 viral"),
            "I'm not sure about that. Try: \"cd4 count\" or \"low cd4\""
        );
    }

    #[test]
    fn test_lexicon_fallback() {
        assert_eq!(suggest("antiretrovirals qqq"), "Try asking about art or hiv");
    }

    #[test]
    fn test_lexicon_concept_without_related() {
        let topics = Vec::new();
        let lexicon = Lexicon::new(vec![Concept::new("viral_load", &["viral load", "vl"])]);
        let generator = SuggestionGenerator::new(&topics, &lexicon, 0.7, 2);

        assert_eq!(generator.suggest("vl"), "Try asking about viral load");
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(suggest("xyz123 unrelated nonsense"), GENERIC_SUGGESTION);
        assert_eq!(suggest(""), GENERIC_SUGGESTION);
    }

    #[test]
    fn test_topic_without_suggestions_falls_through() {
        // "patient" is a known topic with nothing to offer
        assert_eq!(suggest("patients"), GENERIC_SUGGESTION);
    }
}
