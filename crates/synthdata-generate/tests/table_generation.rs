use std::collections::HashSet;

use serde_json::json;

use synthdata_core::FieldSpec;
use synthdata_generate::{GenerateOptions, GeneratedValue, GenerationEngine, GenerationError};

fn seeded(seed: u64, workers: usize, batch_size: usize) -> GenerationEngine {
    GenerationEngine::new(GenerateOptions {
        seed: Some(seed),
        workers: Some(workers),
        batch_size,
        ..GenerateOptions::default()
    })
}

#[test]
fn uuid_and_age_scenario() {
    let engine = GenerationEngine::default();
    let fields = vec![FieldSpec::new("id", "uuid"), FieldSpec::new("age", "age")];
    let table = engine.generate_table(&fields, 5).expect("generate table");

    assert_eq!(table.len(), 5);
    for row in table.rows() {
        let keys: HashSet<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, HashSet::from(["id", "age"]));
        let age = row["age"].as_i64().expect("age integer");
        assert!((18..=65).contains(&age));
    }
}

#[test]
fn unknown_type_fails_the_table() {
    let engine = GenerationEngine::default();
    let fields = vec![FieldSpec::new("x", "bogus")];
    let err = engine.generate_table(&fields, 1).expect_err("unknown type");
    assert!(matches!(err, GenerationError::UnknownType(ref id) if id == "bogus"));
    assert_eq!(err.kind(), "unknown_type");
}

#[test]
fn unknown_type_fails_even_with_zero_rows() {
    let engine = GenerationEngine::default();
    let fields = vec![FieldSpec::new("id", "uuid"), FieldSpec::new("x", "bogus")];
    let err = engine.generate_table(&fields, 0).expect_err("unknown type");
    assert_eq!(err.kind(), "unknown_type");
}

#[test]
fn record_count_matches_request_for_many_batches() {
    let engine = seeded(3, 4, 7);
    let fields = vec![FieldSpec::new("n", "number")];
    for count in [0_i64, 1, 6, 7, 8, 100, 1001] {
        let table = engine.generate_table(&fields, count).expect("generate");
        assert_eq!(table.len() as i64, count);
        assert!(table.rows().iter().all(|row| row.len() == 1));
    }
}

#[test]
fn duplicate_field_names_keep_last_value() {
    let engine = seeded(9, 2, 10);
    let fields = vec![
        FieldSpec::new("value", "uuid"),
        FieldSpec::new("value", "number").with_option("min", json!(42)).with_option("max", json!(42)),
    ];
    let table = engine.generate_table(&fields, 20).expect("generate");
    assert_eq!(table.columns(), ["value".to_string()]);
    for row in table.rows() {
        assert_eq!(row.len(), 1);
        assert_eq!(row["value"], GeneratedValue::Int(42));
    }
}

#[test]
fn seeded_runs_ignore_worker_count() {
    let fields = vec![
        FieldSpec::new("id", "uuid"),
        FieldSpec::new("name", "chineseName"),
        FieldSpec::new("amount", "amount"),
    ];
    let single = seeded(2024, 1, 1000).generate_table(&fields, 500).expect("one worker");
    let many = seeded(2024, 8, 13).generate_table(&fields, 500).expect("eight workers");
    assert_eq!(single, many);

    let other = seeded(2025, 8, 13).generate_table(&fields, 500).expect("other seed");
    assert_ne!(single, other);
}

#[test]
fn negative_count_is_invalid() {
    let engine = GenerationEngine::default();
    let err = engine
        .generate_table(&[FieldSpec::new("id", "uuid")], -1)
        .expect_err("negative count");
    assert_eq!(err.kind(), "invalid_count");
}

#[test]
fn row_cap_is_enforced() {
    let engine = GenerationEngine::new(GenerateOptions {
        max_rows: Some(10),
        ..GenerateOptions::default()
    });
    let fields = vec![FieldSpec::new("id", "uuid")];
    assert_eq!(engine.generate_table(&fields, 10).expect("at cap").len(), 10);
    let err = engine.generate_table(&fields, 11).expect_err("over cap");
    assert!(matches!(err, GenerationError::InvalidCount(_)));
}

#[test]
fn expired_deadline_stops_generation() {
    let engine = GenerationEngine::new(GenerateOptions {
        timeout_ms: Some(0),
        batch_size: 10,
        ..GenerateOptions::default()
    });
    let err = engine
        .generate_table(&[FieldSpec::new("id", "uuid")], 1000)
        .expect_err("deadline");
    assert!(matches!(err, GenerationError::DeadlineExceeded { .. }));
}

#[test]
fn invalid_field_options_fail_before_generation() {
    let engine = GenerationEngine::default();
    let fields = vec![FieldSpec::new("age", "age").with_option("step", json!(1))];
    let err = engine.generate_table(&fields, 3).expect_err("unknown option");
    assert_eq!(err.kind(), "invalid_options");
    assert!(err.to_string().contains("step"));
}

#[test]
fn report_counts_generator_usage() {
    let engine = seeded(1, 2, 4);
    let fields = vec![FieldSpec::new("id", "uuid"), FieldSpec::new("city", "city")];
    let result = engine.run_table(&fields, 9).expect("run table");
    assert_eq!(result.report.seed, 1);
    assert_eq!(result.report.rows_total, 9);
    assert_eq!(result.report.generator_usage.get("uuid"), Some(&9));
    assert_eq!(result.report.generator_usage.get("city"), Some(&9));
    assert_eq!(result.report.tables[0].table, "test_data");
    assert_eq!(result.report.tables[0].batches, 3);
}
