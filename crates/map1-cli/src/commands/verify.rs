//! Verify command implementation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use map1_core::identifier_from_canonical_bytes;
use serde_json::json;

use crate::output;

pub fn run(
    input: Option<String>,
    expect: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = super::read_input(input)?;
    let text = String::from_utf8(raw).map_err(|_| "Input is not base64 text")?;
    let canonical = STANDARD
        .decode(text.trim())
        .map_err(|e| format!("Invalid base64: {}", e))?;

    let id = identifier_from_canonical_bytes(&canonical)
        .map_err(|e| format!("Canonical bytes rejected: {}", e))?;

    let matches = expect.as_deref().map(|want| want == id.as_str());

    if json_output {
        let record = json!({
            "identifier": id.as_str(),
            "matches_expected": matches,
        });
        println!("{}", output::format_json(&record));
    } else {
        println!("{}", id);
    }

    if matches == Some(false) {
        if !json_output {
            eprintln!("Identifier does not match --expect value");
        }
        std::process::exit(1);
    }
    Ok(())
}
