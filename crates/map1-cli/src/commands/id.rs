//! Id command implementation.

use map1_core::{identifier_from_json, Projection};
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

    let id = identifier_from_json(&raw, &projection)
        .map_err(|e| format!("Identifier computation failed: {}", e))?;

    if json_output {
        let record = json!({
            "identifier": id.as_str(),
            "projection": output::projection_label(&bind),
        });
        println!("{}", output::format_json(&record));
    } else {
        println!("{}", id);
    }
    Ok(())
}
