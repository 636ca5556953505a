//! Resolver configuration.
//!
//! The default thresholds reproduce the behaviour the clinic chatbot shipped
//! with. They are empirical, not derived, and may be tuned per deployment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Threshold {name} out of range: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// Score cut-offs for each matching stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Fuzzy stage accepts a trigger scoring above this
    pub fuzzy_accept: f64,
    /// Fuzzy stage attaches a "did you mean" above this
    pub fuzzy_suggest: f64,
    /// Conceptual stage considers situations scoring above this
    pub conceptual_accept: f64,
    /// Multiplier applied to situation similarity (indirect match penalty)
    pub conceptual_discount: f64,
    /// Learned-correction stage accepts mis-phrasings scoring above this
    pub correction_accept: f64,
    /// Fixed confidence assigned to learned corrections
    pub correction_confidence: f64,
    /// Suggestion generator accepts keyword similarity above this
    pub suggestion_accept: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            fuzzy_accept: 0.7,
            fuzzy_suggest: 0.6,
            conceptual_accept: 0.6,
            conceptual_discount: 0.9,
            correction_accept: 0.7,
            correction_confidence: 0.75,
            suggestion_accept: 0.7,
        }
    }
}

impl MatchThresholds {
    /// Check every value lies in [0, 1], and that the values used as
    /// confidences stay strictly below the 1.0 reserved for exact matches.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_range = [
            ("fuzzy_accept", self.fuzzy_accept),
            ("fuzzy_suggest", self.fuzzy_suggest),
            ("conceptual_accept", self.conceptual_accept),
            ("correction_accept", self.correction_accept),
            ("suggestion_accept", self.suggestion_accept),
        ];
        for (name, value) in unit_range {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        let below_exact = [
            ("conceptual_discount", self.conceptual_discount),
            ("correction_confidence", self.correction_confidence),
        ];
        for (name, value) in below_exact {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        Ok(())
    }
}

/// Top-level resolver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub thresholds: MatchThresholds,
    /// Date that relative phrases ("this week") are anchored to.
    /// `None` reads the local calendar date when a resolver is built.
    pub reference_date: Option<NaiveDate>,
    /// Maximum topic suggestions in a reject message
    pub max_suggestions: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            thresholds: MatchThresholds::default(),
            reference_date: None,
            max_suggestions: 2,
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig = serde_json::from_str(json)?;
        if let Err(e) = config.thresholds.validate() {
            tracing::warn!(error = %e, "Rejected resolver configuration");
            return Err(e);
        }
        Ok(config)
    }

    /// Pin relative date filters to a fixed day.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The anchor date: the pinned reference date, else the local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
