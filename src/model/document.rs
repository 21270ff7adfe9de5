//! Document-level types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::segment::{RawSegment, Segment};
use crate::error::Result;

/// Structured article content: segments in rendering order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    /// Undecoded segments
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

impl ContentDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON.
    ///
    /// Accepts `{"segments": [..]}` or a bare array of segments.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a document from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let doc = match value {
            Value::Array(_) => Self {
                segments: serde_json::from_value(value)?,
            },
            other => serde_json::from_value(other)?,
        };
        Ok(doc)
    }

    /// Append a segment.
    pub fn push(&mut self, segment: RawSegment) {
        self.segments.push(segment);
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the document has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Decode every segment, keeping per-segment failures.
    pub fn decode(&self) -> Vec<Result<Segment>> {
        self.segments.iter().map(RawSegment::decode).collect()
    }

    /// Decode every segment, skipping and logging the ones that fail.
    pub fn decode_lenient(&self) -> Vec<Segment> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| match raw.decode() {
                Ok(segment) => Some(segment),
                Err(e) => {
                    log::warn!("skipping segment {} ({}): {}", index, raw.kind, e);
                    None
                }
            })
            .collect()
    }
}
