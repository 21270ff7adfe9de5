//! Handles given to rewriter callbacks.

use std::borrow::Cow;

use super::scan::{parse_attributes, TagInfo};

/// An attribute of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: Option<String>,
    /// Original `name="value"` text, dropped once the value changes.
    source: Option<String>,
}

impl Attribute {
    /// Attribute name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity-decoded value, `None` for a bare attribute like `hidden`.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn write_to(&self, out: &mut String) {
        if let Some(ref source) = self.source {
            out.push_str(source);
            return;
        }
        out.push_str(&self.name);
        if let Some(ref value) = self.value {
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
    }
}

/// A start tag matched by a registered element handler.
///
/// Mutations are buffered; the rewriter serializes the tag again only if
/// something changed, so untouched tags keep their exact source bytes.
#[derive(Debug)]
pub struct Element<'t> {
    source: &'t str,
    written_name: &'t str,
    tag_name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
    modified: bool,
    unwrapped: bool,
}

impl<'t> Element<'t> {
    pub(crate) fn parse(source: &'t str, info: &TagInfo<'_>) -> Self {
        let written_name = &source[1..info.attrs_start];
        let attributes = parse_attributes(source, info.attrs_start)
            .into_iter()
            .map(|raw| Attribute {
                name: raw.name.to_string(),
                value: raw
                    .value
                    .map(|v| html_escape::decode_html_entities(v).into_owned()),
                source: Some(raw.source.to_string()),
            })
            .collect();

        Self {
            source,
            written_name,
            tag_name: written_name.to_ascii_lowercase(),
            attributes,
            self_closing: info.self_closing,
            modified: false,
            unwrapped: false,
        }
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Get an attribute value (names compare ASCII case-insensitively).
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(|i| self.attributes[i].value())
    }

    /// Check whether an attribute is present, with or without a value.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Set an attribute, replacing an existing one in place or appending.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.find(name) {
            Some(i) => {
                let attr = &mut self.attributes[i];
                if attr.value.as_deref() == Some(value.as_str()) {
                    return;
                }
                attr.value = Some(value);
                attr.source = None;
            }
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: Some(value),
                source: None,
            }),
        }
        self.modified = true;
    }

    /// Remove an attribute if present.
    pub fn remove_attribute(&mut self, name: &str) {
        if let Some(i) = self.find(name) {
            self.attributes.remove(i);
            self.modified = true;
        }
    }

    /// All attributes in source order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Drop the start tag and its matching end tag but keep the content.
    pub fn remove_and_keep_content(&mut self) {
        self.unwrapped = true;
    }

    /// Whether the element has been unwrapped by a handler.
    pub fn is_removed(&self) -> bool {
        self.unwrapped
    }

    /// Whether the tag was written in `<x/>` form.
    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Check if any handler changed the tag.
    pub fn is_modified(&self) -> bool {
        self.modified || self.unwrapped
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Serialize the start tag as it should appear in the output.
    pub(crate) fn write_to(&self, out: &mut String) {
        if self.unwrapped {
            return;
        }
        if !self.modified {
            out.push_str(self.source);
            return;
        }
        out.push('<');
        out.push_str(self.written_name);
        for attr in &self.attributes {
            out.push(' ');
            attr.write_to(out);
        }
        if self.self_closing {
            out.push('/');
        }
        out.push('>');
    }
}

/// A run of text directly inside a handled element.
///
/// The text is raw markup text: entities are not decoded.
#[derive(Debug)]
pub struct TextChunk<'t> {
    text: &'t str,
    replacement: Option<String>,
}

impl<'t> TextChunk<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        Self {
            text,
            replacement: None,
        }
    }

    /// The current text, including any earlier replacement.
    pub fn text(&self) -> &str {
        self.replacement.as_deref().unwrap_or(self.text)
    }

    /// Replace the chunk with other markup.
    pub fn replace(&mut self, content: impl Into<String>) {
        self.replacement = Some(content.into());
    }

    /// Remove the chunk from the output.
    pub fn remove(&mut self) {
        self.replacement = Some(String::new());
    }

    /// Whether a handler replaced or removed the chunk.
    pub fn is_replaced(&self) -> bool {
        self.replacement.is_some()
    }

    pub(crate) fn into_output(self) -> Cow<'t, str> {
        match self.replacement {
            Some(s) => Cow::Owned(s),
            None => Cow::Borrowed(self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewriter::scan::parse_tag_info;

    fn element(source: &str) -> Element<'_> {
        let info = parse_tag_info(source.as_bytes());
        Element::parse(source, &info)
    }

    #[test]
    fn test_untouched_element_keeps_source() {
        let src = r#"<IMG  src='a.png'   class=x>"#;
        let el = element(src);
        assert_eq!(el.tag_name(), "img");
        let mut out = String::new();
        el.write_to(&mut out);
        assert_eq!(out, src);
    }

    #[test]
    fn test_attribute_values_are_decoded() {
        let el = element(r#"<a href="/?a=1&amp;b=2" title="&quot;q&quot;">"#);
        assert_eq!(el.get_attribute("href"), Some("/?a=1&b=2"));
        assert_eq!(el.get_attribute("TITLE"), Some("\"q\""));
    }

    #[test]
    fn test_set_and_remove_attribute() {
        let mut el = element(r#"<img src="low.jpg" data-actualsrc="high.jpg" alt="x"/>"#);
        let actual = el.get_attribute("data-actualsrc").unwrap().to_string();
        el.set_attribute("src", actual);
        el.remove_attribute("data-actualsrc");

        let mut out = String::new();
        el.write_to(&mut out);
        assert_eq!(out, r#"<img src="high.jpg" alt="x"/>"#);
    }

    #[test]
    fn test_setting_same_value_is_not_a_modification() {
        let mut el = element(r#"<a href="x">"#);
        el.set_attribute("href", "x");
        assert!(!el.is_modified());
    }

    #[test]
    fn test_written_values_are_escaped() {
        let mut el = element("<a>");
        el.set_attribute("href", "https://x.com/?a=1&b=\"2\"");
        let mut out = String::new();
        el.write_to(&mut out);
        assert_eq!(out, r#"<a href="https://x.com/?a=1&amp;b=&quot;2&quot;">"#);
    }

    #[test]
    fn test_unwrapped_element_writes_nothing() {
        let mut el = element("<u class=\"x\">");
        el.remove_and_keep_content();
        assert!(el.is_removed());
        let mut out = String::new();
        el.write_to(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_text_chunk_replace() {
        let mut chunk = TextChunk::new("hello");
        assert_eq!(chunk.text(), "hello");
        chunk.replace("bye");
        assert_eq!(chunk.text(), "bye");
        assert!(chunk.is_replaced());
        assert_eq!(chunk.into_output(), "bye");
    }
}
