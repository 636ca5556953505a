//! Match candidates and resolution results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed vocabulary of filter parameters a resolution may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    PatientNo,
    Status,
    HivStatus,
    Condition,
    ViralLoadStatus,
    Gender,
    MinAge,
    ProviderName,
    StartDate,
    EndDate,
    AppointmentMissed,
}

impl FilterKey {
    pub const ALL: [FilterKey; 11] = [
        FilterKey::PatientNo,
        FilterKey::Status,
        FilterKey::HivStatus,
        FilterKey::Condition,
        FilterKey::ViralLoadStatus,
        FilterKey::Gender,
        FilterKey::MinAge,
        FilterKey::ProviderName,
        FilterKey::StartDate,
        FilterKey::EndDate,
        FilterKey::AppointmentMissed,
    ];

    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::PatientNo => "patient_no",
            FilterKey::Status => "status",
            FilterKey::HivStatus => "hiv_status",
            FilterKey::Condition => "condition",
            FilterKey::ViralLoadStatus => "viral_load_status",
            FilterKey::Gender => "gender",
            FilterKey::MinAge => "min_age",
            FilterKey::ProviderName => "provider_name",
            FilterKey::StartDate => "start_date",
            FilterKey::EndDate => "end_date",
            FilterKey::AppointmentMissed => "appointment_missed",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted query parameters. Absent categories are omitted, never null.
pub type Filters = BTreeMap<FilterKey, String>;

/// What a matched situation tells the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SituationContext {
    /// Key phrase of the situation that matched
    pub situation: String,
    pub implications: Vec<String>,
    pub suggested_actions: Vec<String>,
}

/// Which strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    Fuzzy,
    Conceptual,
    LearnedCorrection,
}

/// Outcome of the matcher pipeline for one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MatchCandidate {
    /// A trigger expression matched the query directly.
    Exact {
        intent: String,
        handler: String,
        trigger: String,
    },
    /// The query is close to a trigger by edit distance.
    Fuzzy {
        intent: String,
        handler: String,
        confidence: f64,
        suggestion: Option<String>,
    },
    /// The query names a situation whose related query resolved.
    Conceptual {
        intent: String,
        handler: String,
        confidence: f64,
        situation_similarity: f64,
        context: SituationContext,
    },
    /// The query resembles a known mis-phrasing.
    LearnedCorrection {
        intent: String,
        handler: String,
        confidence: f64,
        corrected_to: String,
        suggestion: Option<String>,
    },
    /// No strategy cleared its threshold.
    None,
}

impl MatchCandidate {
    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            MatchCandidate::Exact { .. } => Some(Strategy::Exact),
            MatchCandidate::Fuzzy { .. } => Some(Strategy::Fuzzy),
            MatchCandidate::Conceptual { .. } => Some(Strategy::Conceptual),
            MatchCandidate::LearnedCorrection { .. } => Some(Strategy::LearnedCorrection),
            MatchCandidate::None => None,
        }
    }

    /// Confidence in [0, 1]. Exact matches are always 1.0.
    pub fn confidence(&self) -> f64 {
        match self {
            MatchCandidate::Exact { .. } => 1.0,
            MatchCandidate::Fuzzy { confidence, .. }
            | MatchCandidate::Conceptual { confidence, .. }
            | MatchCandidate::LearnedCorrection { confidence, .. } => *confidence,
            MatchCandidate::None => 0.0,
        }
    }

    pub fn handler(&self) -> Option<&str> {
        match self {
            MatchCandidate::Exact { handler, .. }
            | MatchCandidate::Fuzzy { handler, .. }
            | MatchCandidate::Conceptual { handler, .. }
            | MatchCandidate::LearnedCorrection { handler, .. } => Some(handler),
            MatchCandidate::None => None,
        }
    }

    pub fn intent(&self) -> Option<&str> {
        match self {
            MatchCandidate::Exact { intent, .. }
            | MatchCandidate::Fuzzy { intent, .. }
            | MatchCandidate::Conceptual { intent, .. }
            | MatchCandidate::LearnedCorrection { intent, .. } => Some(intent),
            MatchCandidate::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, MatchCandidate::None)
    }
}

/// How the caller should act on a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Run the handler immediately.
    Auto,
    /// Ask the user before running the handler.
    Confirm,
    /// Run the handler and show the attached situation context.
    Contextual,
    /// Do not run anything; show the message.
    Reject,
}

/// The single result returned for a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    pub mode: ExecutionMode,
    pub candidate: MatchCandidate,
    pub handler_id: Option<String>,
    pub filters: Filters,
    pub confidence: f64,
    pub message: Option<String>,
    pub context: Option<SituationContext>,
}

impl Resolution {
    /// Whether the caller may run the handler without asking.
    pub fn should_execute(&self) -> bool {
        matches!(self.mode, ExecutionMode::Auto | ExecutionMode::Contextual)
            && self.handler_id.is_some()
    }

    pub fn needs_confirmation(&self) -> bool {
        matches!(self.mode, ExecutionMode::Confirm)
    }

    /// Accept a confirm-mode resolution after the user agreed to it.
    ///
    /// Returns `None` for any other mode.
    pub fn confirm(self) -> Option<Resolution> {
        if !self.needs_confirmation() {
            return None;
        }
        Some(Resolution {
            mode: ExecutionMode::Auto,
            message: None,
            ..self
        })
    }

    /// Filter value by key.
    pub fn filter(&self, key: FilterKey) -> Option<&str> {
        self.filters.get(&key).map(String::as_str)
    }
}
