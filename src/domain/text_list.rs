//! Codec for ordered string-list columns (`images`, `amenities`).
//!
//! Lists are stored as a JSON array in a TEXT column so values containing
//! commas survive intact. Rows written by the pre-JSON schema held
//! comma-joined text; decoding falls back to a comma split for those.

/// Encodes a list for storage. Always produces valid JSON (`[]` for empty).
pub fn encode(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a stored column back into an ordered list.
pub fn decode(column: &str) -> Vec<String> {
    let trimmed = column.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(values) = serde_json::from_str::<Vec<String>>(trimmed) {
        return values;
    }
    // Legacy comma-joined rows.
    trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
