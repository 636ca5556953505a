//! Golden tests for the query resolver.
//!
//! These tests run known clinic questions through the full pipeline against
//! the built-in knowledge base.

use chrono::NaiveDate;
use proptest::prelude::*;
use tracing_subscriber::EnvFilter;

use healthflow_query_core::knowledge::builtin_graph;
use healthflow_query_core::{
    resolve, ExecutionMode, FilterKey, KnowledgeBase, Lexicon, PatternCatalog, PatternEntry,
    Resolver, ResolverConfig, SemanticGraph,
};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    query: &'static str,
    expected_mode: ExecutionMode,
    expected_handler: Option<&'static str>,
    expected_confidence: f64,
    expected_message: Option<&'static str>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "exact-art",
            query: "art patients",
            expected_mode: ExecutionMode::Auto,
            expected_handler: Some("getARTPatients"),
            expected_confidence: 1.0,
            expected_message: None,
        },
        GoldenCase {
            id: "exact-mixed-case",
            query: "Show me HIGH Viral Load patients",
            expected_mode: ExecutionMode::Auto,
            expected_handler: Some("getHighViralLoadPatients"),
            expected_confidence: 1.0,
            expected_message: None,
        },
        GoldenCase {
            id: "exact-tb-word",
            query: "tb cases",
            expected_mode: ExecutionMode::Auto,
            expected_handler: Some("getTuberculosisPatients"),
            expected_confidence: 1.0,
            expected_message: None,
        },
        GoldenCase {
            id: "fuzzy-typo",
            query: "apointments",
            expected_mode: ExecutionMode::Confirm,
            expected_handler: Some("getAppointments"),
            expected_confidence: 11.0 / 12.0,
            expected_message: Some("Did you mean: \"appointments\"?"),
        },
        GoldenCase {
            id: "fuzzy-undetectable",
            query: "undetectible",
            expected_mode: ExecutionMode::Confirm,
            expected_handler: Some("getUndetectablePatients"),
            expected_confidence: 11.0 / 12.0,
            expected_message: Some("Did you mean: \"undetectable\"?"),
        },
        GoldenCase {
            id: "learned-viral-load",
            query: "viral load tset",
            expected_mode: ExecutionMode::Confirm,
            expected_handler: Some("getDueForViralLoadTest"),
            expected_confidence: 0.75,
            expected_message: Some("Did you mean: \"due viral load\"?"),
        },
        GoldenCase {
            id: "learned-refill",
            query: "meds refil",
            expected_mode: ExecutionMode::Confirm,
            expected_handler: Some("getOverdueRefillPatients"),
            expected_confidence: 0.75,
            expected_message: Some("Did you mean: \"overdue refill\"?"),
        },
        GoldenCase {
            id: "learned-hiv-check",
            query: "hiv chek",
            expected_mode: ExecutionMode::Confirm,
            expected_handler: Some("getARTPatients"),
            expected_confidence: 0.75,
            expected_message: Some("Did you mean: \"hiv status\"?"),
        },
        GoldenCase {
            id: "conceptual-diabetes",
            query: "uncontroled diabetis",
            expected_mode: ExecutionMode::Contextual,
            expected_handler: Some("getDiabetesPatients"),
            expected_confidence: 19.0 / 21.0 * 0.9,
            expected_message: Some("We know: complications risk. Suggesting: getDiabetesPatients"),
        },
        GoldenCase {
            id: "reject-nonsense",
            query: "xyz123 unrelated nonsense",
            expected_mode: ExecutionMode::Reject,
            expected_handler: None,
            expected_confidence: 0.0,
            expected_message: None,
        },
        GoldenCase {
            id: "reject-topic",
            query: "virals zzz",
            expected_mode: ExecutionMode::Reject,
            expected_handler: None,
            expected_confidence: 0.0,
            expected_message: Some(
                "I'm not sure about that. Try: \"viral load\" or \"high viral load\"",
            ),
        },
    ]
}

#[test]
fn test_golden_cases() {
    init_tracing();
    let kb = KnowledgeBase::builtin();
    let resolver = Resolver::new(&kb);

    for case in get_golden_cases() {
        let resolution = resolver.resolve(case.query);

        assert_eq!(resolution.mode, case.expected_mode, "Case {}: mode mismatch", case.id);

        assert_eq!(
            resolution.handler_id.as_deref(),
            case.expected_handler,
            "Case {}: handler mismatch",
            case.id
        );

        assert!(
            (resolution.confidence - case.expected_confidence).abs() < 1e-9,
            "Case {}: confidence mismatch - expected {}, got {}",
            case.id,
            case.expected_confidence,
            resolution.confidence
        );

        if let Some(expected_message) = case.expected_message {
            assert_eq!(
                resolution.message.as_deref(),
                Some(expected_message),
                "Case {}: message mismatch",
                case.id
            );
        }

        if resolution.mode == ExecutionMode::Reject {
            let message = resolution.message.as_deref().unwrap_or_default();
            assert!(!message.is_empty(), "Case {}: empty reject message", case.id);
        }
    }
}

#[test]
fn test_contextual_situation_via_related_query() {
    init_tracing();
    // No trigger matches the query itself; only the situation's related query does
    let catalog = PatternCatalog::new(vec![PatternEntry::new(
        "high_viral_load",
        &["virological failure"],
        "getHighViralLoadPatients",
    )
    .unwrap()])
    .unwrap();
    let lexicon = Lexicon::default();
    let graph = builtin_graph();

    let resolution = resolve("high viral load", &catalog, &lexicon, &graph);

    assert_eq!(resolution.mode, ExecutionMode::Contextual);
    assert_eq!(resolution.handler_id.as_deref(), Some("getHighViralLoadPatients"));
    assert!((resolution.confidence - 0.9).abs() < 1e-9);
    assert!(resolution.should_execute());

    let context = resolution.context.expect("contextual resolution carries context");
    assert_eq!(context.situation, "high viral load");
    assert!(!context.implications.is_empty());
}

#[test]
fn test_filters_ride_along_with_every_mode() {
    let kb = KnowledgeBase::builtin();
    let config = ResolverConfig::default()
        .with_reference_date(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    let resolver = Resolver::with_config(&kb, config);

    // Expected pairs are listed in key order
    let filter_tests = vec![
        (
            "female patients with diabetes",
            vec![(FilterKey::Condition, "Diabetes"), (FilterKey::Gender, "F")],
        ),
        (
            "missed appointments this week",
            vec![
                (FilterKey::StartDate, "2024-03-10"),
                (FilterKey::EndDate, "2024-03-16"),
                (FilterKey::AppointmentMissed, "true"),
            ],
        ),
        ("patient 025 profile", vec![(FilterKey::PatientNo, "PAT0025")]),
        (
            "xyz123 women over 40",
            vec![(FilterKey::Gender, "F"), (FilterKey::MinAge, "40")],
        ),
    ];

    for (query, expected) in filter_tests {
        let resolution = resolver.resolve(query);
        let expected: Vec<(FilterKey, String)> =
            expected.into_iter().map(|(k, v)| (k, v.to_string())).collect();
        let actual: Vec<(FilterKey, String)> = resolution.filters.into_iter().collect();

        assert_eq!(actual, expected, "Query {:?}: filter mismatch", query);
    }
}

#[test]
fn test_resolution_serializes_for_transport() {
    let kb = KnowledgeBase::builtin();
    let resolution = Resolver::new(&kb).resolve("apointments");

    let json = serde_json::to_value(&resolution).unwrap();

    assert_eq!(json["mode"], "confirm");
    assert_eq!(json["handler_id"], "getAppointments");
    assert_eq!(json["candidate"]["strategy"], "fuzzy");
}

proptest! {
    #[test]
    fn prop_literal_trigger_in_query_is_auto(
        trigger in "[a-z]{3,8}",
        prefix in "[a-z ]{0,10}",
        suffix in "[a-z ]{0,10}",
    ) {
        let catalog = PatternCatalog::new(vec![
            PatternEntry::new("sample", &[trigger.as_str()], "getSample").unwrap(),
        ])
        .unwrap();
        let lexicon = Lexicon::default();
        let graph = SemanticGraph::default();
        let query = format!("{} {} {}", prefix, trigger, suffix);

        let resolution = resolve(&query, &catalog, &lexicon, &graph);

        prop_assert_eq!(resolution.mode, ExecutionMode::Auto);
        prop_assert_eq!(resolution.handler_id.as_deref(), Some("getSample"));
        prop_assert_eq!(resolution.confidence, 1.0);
    }

    #[test]
    fn prop_only_exact_matches_reach_full_confidence(query in "[a-z0-9 ]{0,24}") {
        let kb = KnowledgeBase::builtin();
        let resolution = Resolver::new(&kb).resolve(&query);

        match resolution.mode {
            ExecutionMode::Auto => prop_assert_eq!(resolution.confidence, 1.0),
            ExecutionMode::Confirm | ExecutionMode::Contextual => {
                prop_assert!(resolution.confidence > 0.0);
                prop_assert!(resolution.confidence < 1.0);
                prop_assert!(resolution.message.is_some());
            }
            ExecutionMode::Reject => {
                prop_assert_eq!(resolution.confidence, 0.0);
                prop_assert!(resolution.handler_id.is_none());
                prop_assert!(!resolution.message.unwrap_or_default().is_empty());
            }
        }
    }
}
