use synthdata_core::{FieldSpec, parse_generate_request};
use synthdata_generate::output::export_table;
use synthdata_generate::{ExportFormat, GenerateOptions, GenerationEngine};

fn main() {
    let request = serde_json::json!({
        "fields": [
            {"name": "id", "type": "uuid"},
            {"name": "name", "type": "chineseName"},
            {"name": "phone", "type": "chinesePhone"}
        ],
        "count": 5
    });
    let request = parse_generate_request(&request).expect("valid request");
    let engine = GenerationEngine::new(GenerateOptions {
        seed: Some(42),
        ..GenerateOptions::default()
    });
    let mut fields: Vec<FieldSpec> = request.fields;
    fields.push(FieldSpec::new("city", "city"));
    let table = engine
        .generate_table(&fields, request.count)
        .expect("generate table");
    let csv = export_table(&table, ExportFormat::Csv, "people").expect("export csv");
    println!("{csv}");
}
