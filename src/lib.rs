//! # fxzhihu
//!
//! Content normalization for unfurling Zhihu answers, articles, questions
//! and pins into self-contained HTML with link-preview metadata.
//!
//! ## Quick Start
//!
//! ```
//! use fxzhihu::{extract_references, normalize};
//!
//! let raw = r#"<p><u>Hi</u> <img src="x.svg" data-actualsrc="https://pic.zhimg.com/a.jpg"></p>"#;
//! assert_eq!(
//!     normalize(raw),
//!     r#"<p>Hi <img src="https://pic.zhimg.com/a.jpg"></p>"#
//! );
//! assert_eq!(extract_references(raw), "");
//! ```
//!
//! ## Features
//!
//! - **Streaming rewriter**: single-pass, byte-preserving HTML rewriting
//! - **Normalization**: lazy images, redirect-gateway links, underlines
//! - **References**: footnote markers collected into a bibliography
//! - **Structured content**: article segments with inline marks to HTML
//! - **Pages**: Open Graph pages for every content kind

pub mod error;
pub mod model;
pub mod normalize;
pub mod page;
pub mod reference;
pub mod render;
pub mod rewriter;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{ContentDocument, Mark, MarkKind, RawSegment, Segment, TextRun};
pub use normalize::{normalize, normalize_with_options, NormalizeOptions};
pub use page::{error_page, ContentKind, PageBuilder, PageOptions, PageRegistry};
pub use reference::{collect_references, extract_references, ReferenceEntry, References};
pub use render::{
    render_segments, render_segments_with_result, ErrorMode, JsonFormat, RenderOptions,
    RenderResult, RenderStats, SegmentRenderer,
};
pub use rewriter::{rewrite, HtmlRewriter};

use std::path::Path;

/// Parse structured content from JSON.
///
/// # Example
///
/// ```
/// let doc = fxzhihu::parse_document(r#"[{"type": "hr"}]"#).unwrap();
/// assert_eq!(doc.len(), 1);
/// ```
pub fn parse_document(json: &str) -> Result<ContentDocument> {
    ContentDocument::from_json(json)
}

/// Parse structured content from a JSON file.
pub fn parse_document_file<P: AsRef<Path>>(path: P) -> Result<ContentDocument> {
    let json = std::fs::read_to_string(path)?;
    ContentDocument::from_json(&json)
}

/// Render structured content JSON to HTML with default options.
///
/// # Example
///
/// ```
/// let html = fxzhihu::render_json(
///     r#"[{"type": "paragraph", "paragraph": {"text": "Hello world",
///         "marks": [{"start_index": 0, "end_index": 5, "type": "bold"}]}}]"#,
/// ).unwrap();
/// assert_eq!(html, "<p><strong>Hello</strong> world</p>");
/// ```
pub fn render_json(json: &str) -> Result<String> {
    let doc = parse_document(json)?;
    render_segments(&doc, &RenderOptions::default())
}

/// Build a page for `kind` from its upstream JSON payload.
///
/// # Example
///
/// ```
/// use fxzhihu::{build_page, ContentKind, PageOptions};
///
/// let payload = r#"{"id": 1, "title": "Q", "detail": "", "excerpt": ""}"#;
/// let html = build_page(ContentKind::Question, "1", payload, &PageOptions::default()).unwrap();
/// assert!(html.starts_with("<!DOCTYPE html>"));
/// ```
pub fn build_page(
    kind: ContentKind,
    id: &str,
    payload: &str,
    options: &PageOptions,
) -> Result<String> {
    PageRegistry::with_defaults().build(kind, id, payload, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json() {
        let html = render_json(r#"{"segments": [{"type": "hr"}]}"#).unwrap();
        assert_eq!(html, "<hr>");
    }

    #[test]
    fn test_parse_document_file_missing() {
        let err = parse_document_file("/nonexistent/content.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_build_page_unknown_payload() {
        let err = build_page(ContentKind::Pin, "1", "{}", &PageOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
