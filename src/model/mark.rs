//! Inline marks over a run of text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A styled range `[start, end)` over the characters of a [`TextRun`].
///
/// Offsets count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// First character covered
    pub start: usize,

    /// One past the last character covered
    pub end: usize,

    /// What the mark does
    pub kind: MarkKind,
}

impl Mark {
    /// Create a new mark.
    pub fn new(start: usize, end: usize, kind: MarkKind) -> Self {
        Self { start, end, kind }
    }

    /// Bold range.
    pub fn bold(start: usize, end: usize) -> Self {
        Self::new(start, end, MarkKind::Bold)
    }

    /// Italic range.
    pub fn italic(start: usize, end: usize) -> Self {
        Self::new(start, end, MarkKind::Italic)
    }

    /// Hyperlink range.
    pub fn link(start: usize, end: usize, href: impl Into<String>) -> Self {
        Self::new(start, end, MarkKind::Link { href: href.into() })
    }

    /// Check if the mark covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Mark variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkKind {
    /// Strong emphasis
    Bold,

    /// Emphasis
    Italic,

    /// Hyperlink; rendered only when `href` is non-empty
    Link {
        /// Link target
        href: String,
    },

    /// Formula rendered as an image, the covered text is its source
    Formula {
        /// Rendered formula image
        img_url: String,
        /// Image width in pixels
        width: f64,
        /// Image height in pixels
        height: f64,
    },

    /// Footnote citation
    Reference {
        /// Footnote number
        index: u32,
    },
}

impl MarkKind {
    /// Short name used in logs and statistics.
    pub fn name(&self) -> &'static str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Link { .. } => "link",
            MarkKind::Formula { .. } => "formula",
            MarkKind::Reference { .. } => "reference",
        }
    }
}

/// A mark as it arrives from upstream.
///
/// `{"start_index": 0, "end_index": 5, "type": "link", "link": {"href": ".."}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMark {
    /// Start offset
    #[serde(default)]
    pub start_index: Option<i64>,

    /// End offset
    #[serde(default)]
    pub end_index: Option<i64>,

    /// Mark type name
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Type-specific payloads keyed by type name
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawMark {
    /// Decode into a [`Mark`].
    ///
    /// Returns `Ok(None)` for mark types this crate does not render.
    pub fn decode(&self) -> Result<Option<Mark>> {
        let kind_name = self.kind.as_deref().ok_or_else(|| Error::missing("mark", "type"))?;
        let start = self
            .start_index
            .ok_or_else(|| Error::missing(kind_name, "start_index"))?;
        let end = self
            .end_index
            .ok_or_else(|| Error::missing(kind_name, "end_index"))?;

        let kind = match kind_name {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "link" => MarkKind::Link {
                href: self
                    .payload("link")
                    .and_then(|p| p.get("href"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            "formula" => {
                let payload = self
                    .payload("formula")
                    .ok_or_else(|| Error::missing("formula mark", "formula"))?;
                let img_url = payload
                    .get("img_url")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::missing("formula mark", "img_url"))?;
                MarkKind::Formula {
                    img_url: img_url.to_string(),
                    width: payload.get("width").and_then(Value::as_f64).unwrap_or(0.0),
                    height: payload.get("height").and_then(Value::as_f64).unwrap_or(0.0),
                }
            }
            "reference" => {
                let index = self
                    .payload("reference")
                    .and_then(|p| p.get("index"))
                    .ok_or_else(|| Error::missing("reference mark", "index"))?;
                MarkKind::Reference {
                    index: as_index(index)
                        .ok_or_else(|| Error::invalid("reference mark", "index", index.to_string()))?,
                }
            }
            other => {
                log::debug!("ignoring mark of unknown type {:?}", other);
                return Ok(None);
            }
        };

        Ok(Some(Mark::new(
            start.max(0) as usize,
            end.max(0) as usize,
            kind,
        )))
    }

    fn payload(&self, name: &str) -> Option<&Map<String, Value>> {
        self.fields.get(name).and_then(Value::as_object)
    }
}

/// Footnote indices show up both as numbers and as numeric strings.
fn as_index(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Plain text with marks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Marks over `text`, in upstream order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl TextRun {
    /// Create an unmarked run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Add a mark.
    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Decode `{"text": .., "marks": [..]}` from a segment body.
    pub(crate) fn from_body(kind: &str, body: &Map<String, Value>) -> Result<Self> {
        let text = body
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::missing(kind, "text"))?;

        let marks = match body.get("marks") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(raw)) => {
                let mut marks = Vec::with_capacity(raw.len());
                for value in raw {
                    let raw_mark: RawMark = serde_json::from_value(value.clone())
                        .map_err(|e| Error::invalid(kind, "marks", e.to_string()))?;
                    if let Some(mark) = raw_mark.decode()? {
                        marks.push(mark);
                    }
                }
                marks
            }
            Some(_) => return Err(Error::invalid(kind, "marks", "expected an array")),
        };

        Ok(Self {
            text: text.to_string(),
            marks,
        })
    }
}
