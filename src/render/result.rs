//! Rendering result with statistics and recovered failures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{MarkKind, Segment};

/// Result of rendering a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered HTML
    pub content: String,

    /// Rendering statistics
    pub stats: RenderStats,

    /// Segments skipped in lenient mode
    pub issues: Vec<SegmentIssue>,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: RenderStats, issues: Vec<SegmentIssue>) -> Self {
        Self {
            content,
            stats,
            issues,
        }
    }

    /// Create a result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    /// Check if every segment rendered.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A segment that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentIssue {
    /// Position in the document
    pub index: usize,

    /// Upstream kind name
    pub kind: String,

    /// Error message
    pub message: String,
}

/// Statistics collected during rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Segments rendered, by upstream kind name
    pub segments: BTreeMap<String, u32>,

    /// Segments that failed to decode
    pub skipped: u32,

    /// Segments rendered with the text fallback
    pub unknown: u32,

    /// Marks resolved
    pub marks: u32,

    /// Formula marks
    pub formulas: u32,

    /// Footnote citations
    pub footnotes: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one rendered segment and the marks it carries.
    pub fn add_segment(&mut self, segment: &Segment) {
        *self
            .segments
            .entry(segment.kind_name().to_string())
            .or_insert(0) += 1;

        if matches!(segment, Segment::Unknown { .. }) {
            self.unknown += 1;
        }

        for run in segment.runs() {
            for mark in &run.marks {
                self.marks += 1;
                match mark.kind {
                    MarkKind::Formula { .. } => self.formulas += 1,
                    MarkKind::Reference { .. } => self.footnotes += 1,
                    _ => {}
                }
            }
        }
    }

    /// Count one skipped segment.
    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Total segments rendered.
    pub fn total(&self) -> u32 {
        self.segments.values().sum()
    }

    /// Segments of one kind.
    pub fn count(&self, kind: &str) -> u32 {
        self.segments.get(kind).copied().unwrap_or(0)
    }
}
