use std::fs;
use std::path::Path;

use synthdata_core::{
    RelationType, parse_generate_request, parse_relational_request,
    relational_request_json_schema, validate_request_json,
};

fn load_json(path: &Path) -> serde_json::Value {
    let contents =
        fs::read_to_string(path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

fn request_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../requests/examples")
        .join(name)
}

#[test]
fn basic_generate_request_parses() {
    let json = load_json(&request_path("basic.generate.json"));
    let request = parse_generate_request(&json).expect("parse generate request");

    assert_eq!(request.count, 20);
    let names: Vec<&str> = request.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "name", "age", "email", "amount", "created_at"]
    );
    assert_eq!(
        request.fields[4].options.get("max").and_then(|v| v.as_i64()),
        Some(5000)
    );
}

#[test]
fn users_orders_request_parses() {
    let json = load_json(&request_path("users_orders.relational.json"));
    let request = parse_relational_request(&json).expect("parse relational request");

    assert_eq!(request.tables.len(), 3);
    assert_eq!(request.tables[2].name, "orders");
    assert_eq!(request.tables[2].row_count, 50);
    assert_eq!(request.relations[0].relation_type, RelationType::OneToOne);
    assert_eq!(request.relations[1].relation_type, RelationType::OneToMany);
}

#[test]
fn raw_legacy_count_fails_strict_schema_check() {
    let json = load_json(&request_path("users_orders.relational.json"));
    let schema =
        serde_json::to_value(relational_request_json_schema()).expect("serialize schema");

    let report = validate_request_json(&json, &schema).expect("compile schema");
    assert!(
        report.errors.iter().any(|issue| issue.path == "/tables/2"),
        "orders uses the legacy count key and needs normalization"
    );
}
