//! Canon command implementation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use map1_core::{canonical_bytes_from_json, Identifier, Projection};
use serde_json::json;

use crate::output;

pub fn run(
    input: Option<String>,
    bind: Vec<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = super::read_input(input)?;

    let pointers: Vec<&str> = bind.iter().map(String::as_str).collect();
    let projection = if pointers.is_empty() {
        Projection::Full
    } else {
        Projection::Bind(&pointers)
    };

    let bytes = canonical_bytes_from_json(&raw, &projection)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    let encoded = STANDARD.encode(&bytes);

    if json_output {
        let record = json!({
            "canonical_b64": encoded,
            "identifier": Identifier::compute(&bytes).as_str(),
            "projection": output::projection_label(&bind),
        });
        println!("{}", output::format_json(&record));
    } else {
        println!("{}", encoded);
    }
    Ok(())
}
