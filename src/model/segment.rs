//! Structured article content.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::mark::TextRun;
use crate::error::{Error, Result};

/// One block of article content as it arrives from upstream.
///
/// Decoding is deferred to [`RawSegment::decode`] so that one malformed
/// segment does not poison the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    /// Segment kind, e.g. `paragraph`
    #[serde(rename = "type")]
    pub kind: String,

    /// The kind-specific body, keyed by the kind name, plus anything else
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawSegment {
    /// Build a raw segment from its kind and body.
    pub fn new(kind: impl Into<String>, body: Value) -> Self {
        let kind = kind.into();
        let mut fields = Map::new();
        fields.insert(kind.clone(), body);
        Self { kind, fields }
    }

    /// Decode into a typed [`Segment`].
    ///
    /// Unknown kinds decode to [`Segment::Unknown`]; a known kind with a
    /// missing or malformed required field is an error.
    pub fn decode(&self) -> Result<Segment> {
        let segment = match self.kind.as_str() {
            "paragraph" => Segment::Paragraph(TextRun::from_body("paragraph", self.body("paragraph")?)?),
            "heading" => {
                let body = self.body("heading")?;
                let level = match body.get("level") {
                    None | Some(Value::Null) => 2,
                    Some(v) => v
                        .as_u64()
                        .ok_or_else(|| Error::invalid("heading", "level", v.to_string()))?,
                };
                Segment::Heading {
                    level: level.clamp(1, 6) as u8,
                    run: TextRun::from_body("heading", body)?,
                }
            }
            "blockquote" => Segment::Blockquote(TextRun::from_body("blockquote", self.body("blockquote")?)?),
            "image" => {
                let image: ImageSegment = self.typed("image")?;
                if image.urls.iter().all(|u| u.is_empty()) {
                    return Err(Error::invalid("image", "urls", "no image URL"));
                }
                Segment::Image(image)
            }
            "card" => Segment::Card(self.typed("card")?),
            "video" => Segment::Video(self.typed("video")?),
            "code_block" => Segment::CodeBlock(self.typed("code_block")?),
            "list_node" => {
                let body = self.body("list_node")?;
                let kind = match body.get("type").and_then(Value::as_str) {
                    Some("ordered") => ListKind::Ordered,
                    _ => ListKind::Unordered,
                };
                let raw_items = body
                    .get("items")
                    .and_then(Value::as_array)
                    .ok_or_else(|| Error::missing("list_node", "items"))?;
                let mut items = Vec::with_capacity(raw_items.len());
                for item in raw_items {
                    let item = item
                        .as_object()
                        .ok_or_else(|| Error::invalid("list_node", "items", "item is not an object"))?;
                    items.push(TextRun::from_body("list_node", item)?);
                }
                Segment::List { kind, items }
            }
            "hr" => Segment::HorizontalRule,
            "reference_block" => {
                let block: ReferenceBlock = self.typed("reference_block")?;
                Segment::ReferenceBlock { items: block.items }
            }
            other => Segment::Unknown {
                kind: other.to_string(),
                text: self.fallback_text(),
            },
        };
        Ok(segment)
    }

    fn body(&self, kind: &'static str) -> Result<&Map<String, Value>> {
        match self.fields.get(kind) {
            Some(Value::Object(body)) => Ok(body),
            Some(_) => Err(Error::invalid(kind, kind, "expected an object")),
            None => Err(Error::missing(kind, kind)),
        }
    }

    fn typed<T: serde::de::DeserializeOwned>(&self, kind: &'static str) -> Result<T> {
        let body = self.body(kind)?;
        serde_json::from_value(Value::Object(body.clone())).map_err(|e| schema_error(kind, e))
    }

    /// Best-effort text of an unknown segment: `text` in its body or at the
    /// top level.
    fn fallback_text(&self) -> Option<String> {
        self.fields
            .get(&self.kind)
            .and_then(|body| body.get("text"))
            .or_else(|| self.fields.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Map a serde error on a segment body to the field it complains about.
fn schema_error(kind: &'static str, e: serde_json::Error) -> Error {
    let message = e.to_string();
    if let Some(rest) = message.strip_prefix("missing field `") {
        if let Some(field) = rest.split('`').next() {
            if let Some(field) = known_field(field) {
                return Error::missing(kind, field);
            }
        }
    }
    Error::invalid(kind, kind, message)
}

fn known_field(name: &str) -> Option<&'static str> {
    const FIELDS: &[&str] = &[
        "urls", "url", "title", "video_id", "content", "items", "index", "text",
    ];
    FIELDS.iter().copied().find(|f| *f == name)
}

/// A decoded content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum Segment {
    /// Body paragraph
    Paragraph(TextRun),

    /// Section heading
    Heading {
        /// Level 1 to 6
        level: u8,
        /// Heading text
        run: TextRun,
    },

    /// Quotation
    Blockquote(TextRun),

    /// Figure
    Image(ImageSegment),

    /// Link card
    Card(CardSegment),

    /// Embedded video
    Video(VideoSegment),

    /// Preformatted code
    CodeBlock(CodeBlock),

    /// Ordered or unordered list
    List {
        /// List style
        kind: ListKind,
        /// One run per item
        items: Vec<TextRun>,
    },

    /// Thematic break
    HorizontalRule,

    /// Footnote list
    ReferenceBlock {
        /// Footnotes in upstream order
        items: Vec<ReferenceItem>,
    },

    /// Kind this crate does not know
    Unknown {
        /// Upstream kind name
        kind: String,
        /// Best-effort text
        text: Option<String>,
    },
}

impl Segment {
    /// Upstream kind name of the segment.
    pub fn kind_name(&self) -> &str {
        match self {
            Segment::Paragraph(_) => "paragraph",
            Segment::Heading { .. } => "heading",
            Segment::Blockquote(_) => "blockquote",
            Segment::Image(_) => "image",
            Segment::Card(_) => "card",
            Segment::Video(_) => "video",
            Segment::CodeBlock(_) => "code_block",
            Segment::List { .. } => "list_node",
            Segment::HorizontalRule => "hr",
            Segment::ReferenceBlock { .. } => "reference_block",
            Segment::Unknown { kind, .. } => kind,
        }
    }

    /// Text runs carried by the segment, for mark statistics.
    pub fn runs(&self) -> Vec<&TextRun> {
        match self {
            Segment::Paragraph(run) | Segment::Blockquote(run) | Segment::Heading { run, .. } => {
                vec![run]
            }
            Segment::List { items, .. } => items.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Image payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSegment {
    /// Candidate URLs, best first
    pub urls: Vec<String>,

    /// Width in pixels
    #[serde(default)]
    pub width: u32,

    /// Height in pixels
    #[serde(default)]
    pub height: u32,

    /// Caption
    #[serde(default)]
    pub description: Option<String>,
}

impl ImageSegment {
    /// The URL to render.
    pub fn url(&self) -> Option<&str> {
        self.urls.iter().map(String::as_str).find(|u| !u.is_empty())
    }
}

/// Link card payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSegment {
    /// Card target
    pub url: String,

    /// Card title, falls back to the URL
    #[serde(default)]
    pub title: Option<String>,

    /// Upstream card flavour
    #[serde(default)]
    pub card_type: Option<String>,
}

/// Video payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSegment {
    /// Upstream video id
    pub video_id: String,

    /// Video title
    #[serde(default)]
    pub title: Option<String>,

    /// Playable URL
    #[serde(default)]
    pub url: Option<String>,

    /// Poster image
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Code block payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language tag, may be empty
    #[serde(default)]
    pub language: Option<String>,

    /// Source text
    pub content: String,
}

/// List style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// `<ol>`
    Ordered,
    /// `<ul>`
    Unordered,
}

/// One footnote of a reference block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    /// Footnote number
    pub index: u32,

    /// Display text
    pub text: String,

    /// Target URL
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct ReferenceBlock {
    items: Vec<ReferenceItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segment(value: Value) -> RawSegment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_paragraph() {
        let seg = segment(json!({"type": "paragraph", "paragraph": {"text": "hi", "marks": []}}))
            .decode()
            .unwrap();
        assert_eq!(seg, Segment::Paragraph(TextRun::new("hi")));
        assert_eq!(seg.kind_name(), "paragraph");
    }

    #[test]
    fn test_decode_heading_clamps_level() {
        let seg = segment(json!({"type": "heading", "heading": {"level": 9, "text": "T"}}))
            .decode()
            .unwrap();
        assert!(matches!(seg, Segment::Heading { level: 6, .. }));
    }

    #[test]
    fn test_decode_image_requires_url() {
        let err = segment(json!({"type": "image", "image": {"width": 10}}))
            .decode()
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "urls", .. }));

        let err = segment(json!({"type": "image", "image": {"urls": []}}))
            .decode()
            .unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_decode_list() {
        let seg = segment(json!({"type": "list_node", "list_node": {
            "type": "ordered",
            "items": [{"text": "a"}, {"text": "b"}]
        }}))
        .decode()
        .unwrap();
        match seg {
            Segment::List { kind, items } => {
                assert_eq!(kind, ListKind::Ordered);
                assert_eq!(items.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_body_is_error() {
        let err = segment(json!({"type": "paragraph"})).decode().unwrap_err();
        assert_eq!(err.to_string(), "paragraph is missing required field `paragraph`");
    }

    #[test]
    fn test_unknown_kind_keeps_text() {
        let seg = segment(json!({"type": "poll", "poll": {"text": "Vote <now>"}}))
            .decode()
            .unwrap();
        assert_eq!(
            seg,
            Segment::Unknown {
                kind: "poll".into(),
                text: Some("Vote <now>".into())
            }
        );
    }

    #[test]
    fn test_hr_needs_no_body() {
        assert_eq!(
            segment(json!({"type": "hr"})).decode().unwrap(),
            Segment::HorizontalRule
        );
    }

    #[test]
    fn test_decode_reference_block() {
        let seg = segment(json!({"type": "reference_block", "reference_block": {
            "items": [{"index": 1, "text": "Book", "url": "https://b.example"}]
        }}))
        .decode()
        .unwrap();
        match seg {
            Segment::ReferenceBlock { items } => assert_eq!(items[0].index, 1),
            other => panic!("unexpected {:?}", other),
        }
    }
}
