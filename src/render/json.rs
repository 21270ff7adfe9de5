//! JSON dump of decoded content.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{ContentDocument, Segment};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct DecodedDocument {
    segments: Vec<Segment>,
}

/// Decode a document and dump its segments as JSON.
///
/// Segments that fail to decode are left out and logged.
pub fn to_json(doc: &ContentDocument, format: JsonFormat) -> Result<String> {
    let decoded = DecodedDocument {
        segments: doc.decode_lenient(),
    };
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&decoded),
        JsonFormat::Compact => serde_json::to_string(&decoded),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentDocument {
        ContentDocument::from_json(
            r#"[
                {"type": "paragraph", "paragraph": {"text": "Hello", "marks": [
                    {"start_index": 0, "end_index": 5, "type": "bold"}
                ]}},
                {"type": "image", "image": {}}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"segment\": \"paragraph\""));
        assert!(json.contains("\"type\": \"bold\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_skips_bad_segments() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["segments"].as_array().unwrap().len(), 1);
    }
}
