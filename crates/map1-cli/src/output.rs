//! Output formatting utilities.

use serde_json::Value;

/// Formats a result record as pretty JSON.
pub fn format_json(record: &Value) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
}

/// Names the projection for output records.
pub fn projection_label(bind: &[String]) -> &'static str {
    if bind.is_empty() {
        "full"
    } else {
        "bind"
    }
}
