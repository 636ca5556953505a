//! Built-in healthcare knowledge: HIV care, NCDs and appointments.

use std::sync::LazyLock;

use crate::models::{
    Concept, CorrectionEntry, CorrectionTable, Lexicon, PatternCatalog, PatternEntry,
    SemanticGraph, SituationNode, SuggestionTopic,
};

/// Shared correction table for callers that supply only catalog, lexicon and graph.
pub static BUILTIN_CORRECTIONS: LazyLock<CorrectionTable> = LazyLock::new(builtin_corrections);

/// Shared suggestion vocabulary for callers that supply only catalog, lexicon and graph.
pub static BUILTIN_SUGGESTION_TOPICS: LazyLock<Vec<SuggestionTopic>> =
    LazyLock::new(builtin_suggestion_topics);

fn entry(intent: &str, triggers: &[&str], handler: &str) -> PatternEntry {
    PatternEntry::new(intent, triggers, handler).expect("Invalid built-in pattern entry")
}

/// Default pattern catalog, most specific intents first.
pub fn builtin_catalog() -> PatternCatalog {
    let entries = vec![
        // Single patient
        entry(
            "patient_profile",
            &[r"\bpid\d+", r"profile.*patient", r"tell.*about"],
            "getPatientProfile",
        ),
        entry(
            "high_risk",
            &[r"high.*risk", r"at risk", r"vulnerable"],
            "getHighRiskPatients",
        ),

        // Appointments
        entry(
            "appointments_today",
            &[r"appointments? today", r"today'?s appointments?"],
            "getAppointmentsToday",
        ),
        entry(
            "appointments_next_week",
            &[r"appointment.*next week", r"upcoming"],
            "getAppointmentsNextWeek",
        ),
        entry(
            "missed_appointments",
            &[r"missed.*appointment", r"defaulter", r"poor adherence", r"\bltfu\b"],
            "getMissedAppointments",
        ),
        entry(
            "due_appointments",
            &[r"overdue appointment", r"due appointment", r"pending appointment"],
            "getDueAppointments",
        ),
        entry(
            "appointments",
            &[r"appointment", r"appointments", r"scheduled"],
            "getAppointments",
        ),

        // HIV care
        entry(
            "due_viral_load",
            &[r"due viral load", r"due for viral load", r"overdue viral load"],
            "getDueForViralLoadTest",
        ),
        entry(
            "high_viral_load",
            &[r"high.*viral", r"elevated viral", r"virological failure"],
            "getHighViralLoadPatients",
        ),
        entry(
            "undetectable_viral",
            &[r"undetectable", r"u=u", r"suppressed"],
            "getUndetectablePatients",
        ),
        entry("due_cd4", &[r"due cd4", r"cd4.*due"], "getDueForCD4Test"),
        entry("low_cd4", &[r"low cd4", r"cd4.*low"], "getLowCD4Patients"),
        entry(
            "art_patients",
            &[r"on art", r"art.*patient", r"hiv status"],
            "getARTPatients",
        ),
        entry(
            "overdue_refill",
            &[r"overdue refill", r"refill"],
            "getOverdueRefillPatients",
        ),

        // Registration and demographics
        entry("new_patients", &[r"new.*patient", r"registered"], "getNewPatients"),

        // NCDs
        entry("diabetes", &[r"diabetes", r"glucose"], "getDiabetesPatients"),
        entry(
            "hypertension",
            &[r"hypertension", r"high.*blood.*pressure"],
            "getHypertensionPatients",
        ),
        entry(
            "tuberculosis",
            &[r"tuberculosis", r"\btb\b"],
            "getTuberculosisPatients",
        ),

        entry("total_patients", &[r"total.*patient", r"how many"], "getTotalPatients"),
        entry("female_patients", &[r"\bfemale\b", r"\bwomen\b"], "getFemalePatients"),
        entry("male_patients", &[r"\bmale\b", r"\bmen\b"], "getMalePatients"),
    ];

    PatternCatalog::new(entries).expect("Duplicate intent in built-in catalog")
}

/// Default concept lexicon.
pub fn builtin_lexicon() -> Lexicon {
    Lexicon::new(vec![
        Concept::new("hiv", &["hiv", "hiv/aids", "aids", "hiv positive", "positive status"])
            .with_related(&["art", "antiretroviral", "cd4", "viral load", "treatment"]),
        Concept::new(
            "art",
            &["art", "antiretroviral", "arv", "medication", "treatment", "therapy"],
        )
        .with_related(&["hiv", "regimen", "adherence", "viral load", "suppression"]),
        Concept::new(
            "viral_load",
            &["viral load", "vl", "viral", "rna", "copies", "viremia"],
        )
        .with_related(&["suppression", "undetectable", "treatment failure", "adherence"]),
        Concept::new("cd4", &["cd4", "cd4 count", "immune", "cells", "t-cells"])
            .with_related(&["recovery", "immune reconstitution", "treatment"]),
        Concept::new(
            "diabetes",
            &["diabetes", "dm", "glucose", "blood sugar", "hyperglycemia"],
        )
        .with_related(&["insulin", "hba1c", "glucose monitoring", "complications"]),
        Concept::new(
            "hypertension",
            &["hypertension", "htn", "high bp", "blood pressure", "elevated bp"],
        )
        .with_related(&["cardiovascular", "stroke", "medication"]),
        Concept::new(
            "appointment",
            &["appointment", "clinic", "visit", "follow-up", "schedule", "meeting"],
        )
        .with_related(&["defaulter", "adherence", "attendance"]),
        Concept::new(
            "test",
            &["test", "lab", "examination", "screening", "check", "investigation"],
        )
        .with_related(&["results", "monitoring", "baseline"]),
    ])
}

/// Default situation graph.
pub fn builtin_graph() -> SemanticGraph {
    SemanticGraph::new(vec![
        SituationNode::new(
            "high viral load",
            &["treatment failure", "adherence issue", "drug resistance possible"],
            &["check adherence", "assess barriers", "consider switch"],
            &["patients with poor adherence", "virological failure"],
        ),
        SituationNode::new(
            "low cd4",
            &["immunosuppressed", "oi risk", "need prophylaxis"],
            &["start prophylaxis", "monitor closely", "assess oi signs"],
            &["patients on prophylaxis", "oi patients"],
        ),
        SituationNode::new(
            "missed appointment",
            &["adherence issue", "ltfu risk", "treatment interruption"],
            &["followup call", "assess barriers", "counseling"],
            &["poor adherence patients", "defaulter tracking"],
        ),
        SituationNode::new(
            "uncontrolled diabetes",
            &["complications risk", "hba1c elevated", "needs intensification"],
            &["medication review", "lifestyle counseling", "hba1c testing"],
            &["patients on insulin", "diabetes monitoring"],
        ),
    ])
}

/// Common mis-phrasings seen in the clinic chat logs.
pub fn builtin_corrections() -> CorrectionTable {
    CorrectionTable::new(vec![
        CorrectionEntry::new("viral load test", "due viral load"),
        CorrectionEntry::new("cd4 test", "due cd4"),
        CorrectionEntry::new("meds refill", "overdue refill"),
        CorrectionEntry::new("hiv check", "hiv status"),
        CorrectionEntry::new("art med", "art patients"),
    ])
}

/// Keywords the reject message can steer users toward.
pub fn builtin_suggestion_topics() -> Vec<SuggestionTopic> {
    vec![
        SuggestionTopic::new("patient", &[]),
        SuggestionTopic::new("viral", &["viral load", "high viral load"]),
        SuggestionTopic::new("cd4", &["cd4 count", "low cd4"]),
        SuggestionTopic::new("appointment", &["appointments today", "overdue appointments"]),
        SuggestionTopic::new("test", &[]),
        SuggestionTopic::new("medication", &["overdue refill"]),
        SuggestionTopic::new("blood", &[]),
        SuggestionTopic::new("pressure", &["high blood pressure"]),
        SuggestionTopic::new("diabetes", &["diabetes patients", "uncontrolled diabetes"]),
    ]
}
