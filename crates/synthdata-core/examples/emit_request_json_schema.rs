use synthdata_core::{generate_request_json_schema, relational_request_json_schema};

fn main() {
    let which = std::env::args().nth(1).unwrap_or_else(|| "generate".to_string());
    let schema = match which.as_str() {
        "relational" => relational_request_json_schema(),
        _ => generate_request_json_schema(),
    };
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
