use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use regex::Regex;
use serde_json::json;

use synthdata_core::FieldSpec;
use synthdata_generate::masking::{auto_detect_and_mask, mask_table_seeded};
use synthdata_generate::output::export_table;
use synthdata_generate::{
    ExportFormat, GenerateOptions, GeneratedValue, GenerationEngine, MaskPreset, MaskRule,
    MaskRules, MaskStrategy, mask_table,
};

fn people(count: i64) -> synthdata_generate::GeneratedTable {
    let engine = GenerationEngine::new(GenerateOptions {
        seed: Some(11),
        ..GenerateOptions::default()
    });
    let fields = vec![
        FieldSpec::new("id", "number"),
        FieldSpec::new("name", "chineseName"),
        FieldSpec::new("phone", "chinesePhone"),
        FieldSpec::new("id_card", "chineseIdCard"),
        FieldSpec::new("email", "email"),
    ];
    engine.generate_table(&fields, count).expect("generate people")
}

#[test]
fn presets_mask_generated_personal_data() {
    let mut table = people(40);
    let original = table.clone();
    let rules: MaskRules = [
        ("phone", MaskRule::preset(MaskPreset::Phone)),
        ("id_card", MaskRule::preset(MaskPreset::IdCard)),
        ("name", MaskRule::preset(MaskPreset::Name)),
        ("email", MaskRule::strategy(MaskStrategy::Null)),
        ("not_a_column", MaskRule::preset(MaskPreset::Password)),
    ]
    .into_iter()
    .map(|(field, rule)| (field.to_string(), rule))
    .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let masked = mask_table(&mut table, &rules, &mut rng).expect("mask table");
    assert_eq!(masked, 40 * 4);

    let phone = Regex::new(r"^1[0-9]{2}\*{4}[0-9]{4}$").expect("regex");
    let id_card = Regex::new(r"^[0-9]{6}\*{8}[0-9]{4}$").expect("regex");
    let name = Regex::new(r"^\p{Han}\*\*$").expect("regex");
    for (row, before) in table.rows().iter().zip(original.rows()) {
        assert!(phone.is_match(row["phone"].as_str().expect("phone")));
        assert!(id_card.is_match(row["id_card"].as_str().expect("id card")));
        assert!(name.is_match(row["name"].as_str().expect("name")));
        assert_eq!(row["email"], GeneratedValue::Null);
        assert_eq!(row["id"], before["id"]);
        assert!(!row.contains_key("not_a_column"));
    }
    assert_eq!(table.columns(), original.columns());
}

#[test]
fn invalid_rule_leaves_table_untouched() {
    let mut table = people(5);
    let original = table.clone();
    let rules: MaskRules = [
        ("phone".to_string(), MaskRule::preset(MaskPreset::Phone)),
        (
            "email".to_string(),
            MaskRule::strategy(MaskStrategy::Partial).with_option("pattern", json!("[")),
        ),
    ]
    .into_iter()
    .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let err = mask_table(&mut table, &rules, &mut rng).expect_err("bad pattern");
    assert_eq!(err.kind(), "invalid_options");
    assert_eq!(table, original);
}

#[test]
fn masked_nulls_export_per_format() {
    let mut table = people(2);
    let rules: MaskRules = [("email".to_string(), MaskRule::strategy(MaskStrategy::Null))]
        .into_iter()
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    mask_table(&mut table, &rules, &mut rng).expect("mask");

    let json: serde_json::Value =
        serde_json::from_str(&export_table(&table, ExportFormat::Json, "people").expect("json"))
            .expect("parse json");
    assert!(json[0]["email"].is_null());

    let sql = export_table(&table, ExportFormat::Sql, "people").expect("sql");
    assert_eq!(sql.matches(", NULL)").count(), 2);

    let csv = export_table(&table, ExportFormat::Csv, "people").expect("csv");
    assert!(csv.lines().skip(1).all(|line| line.ends_with(",\"\"")));
}

#[test]
fn auto_detection_recognizes_generated_values() {
    let table = people(10);
    for row in table.rows() {
        let phone = row["phone"].as_str().expect("phone");
        let (_, detected) = auto_detect_and_mask(phone).expect("detect phone");
        assert_eq!(detected, Some(MaskPreset::Phone));

        let id_card = row["id_card"].as_str().expect("id card");
        let (masked, detected) = auto_detect_and_mask(id_card).expect("detect id card");
        assert_eq!(detected, Some(MaskPreset::IdCard));
        assert!(masked.contains("********"));
    }
}

#[test]
fn seeded_shuffle_is_repeatable() {
    let rules: MaskRules = [("name".to_string(), MaskRule::strategy(MaskStrategy::Shuffle))]
        .into_iter()
        .collect();
    let run = || {
        let mut table = people(25);
        mask_table_seeded(&mut table, &rules, 42).expect("mask");
        table
    };
    assert_eq!(run(), run());
}
