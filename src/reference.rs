//! Footnote extraction from upstream HTML.
//!
//! The editor marks citations as `<sup data-text=".." data-url=".."
//! data-numero="N">`. The markers themselves stay in the body; this module
//! collects them into the bibliography shown below it.

use std::cmp::Ordering;
use std::collections::HashMap;

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

use crate::rewriter::HtmlRewriter;

/// Heading of the rendered bibliography section.
pub const REFERENCE_HEADING: &str = "参考";

/// A single footnote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Footnote key as written in the markup (numeric in practice)
    pub key: String,

    /// Display text
    pub text: String,

    /// Target URL
    pub url: String,
}

/// Footnotes keyed by their number, last write wins.
#[derive(Debug, Clone, Default)]
pub struct References {
    entries: HashMap<String, ReferenceEntry>,
    order: Vec<String>,
}

impl References {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any earlier entry with the same key.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>, url: impl Into<String>) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(
            key.clone(),
            ReferenceEntry {
                key,
                text: text.into(),
                url: url.into(),
            },
        );
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no footnotes were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&ReferenceEntry> {
        self.entries.get(key)
    }

    /// Entries ordered by the numeric value of their key.
    ///
    /// Keys that are not integers come last, in the order first seen.
    pub fn sorted(&self) -> Vec<&ReferenceEntry> {
        let mut keyed: Vec<(usize, Option<i64>, &ReferenceEntry)> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(seen, key)| {
                self.entries
                    .get(key)
                    .map(|entry| (seen, key.trim().parse::<i64>().ok(), entry))
            })
            .collect();

        keyed.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => x.cmp(&y).then(a.0.cmp(&b.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        keyed.into_iter().map(|(_, _, entry)| entry).collect()
    }

    /// Render the bibliography block, or an empty string when there are no
    /// entries.
    pub fn to_html(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let items: Vec<String> = self
            .sorted()
            .into_iter()
            .map(|entry| {
                format!(
                    "{}. {} <a href=\"{}\">{}</a>",
                    encode_text(&entry.key),
                    encode_text(&entry.text),
                    encode_double_quoted_attribute(&entry.url),
                    encode_text(&entry.url)
                )
            })
            .collect();

        format!(
            "<hr><section><h2>{}</h2>{}</section>",
            REFERENCE_HEADING,
            items.join("<br>")
        )
    }
}

/// Collect every complete footnote marker in `html`.
///
/// Markers missing any of the three attributes, or with an empty one, are
/// ignored.
pub fn collect_references(html: &str) -> References {
    let mut references = References::new();

    let mut rewriter = HtmlRewriter::new().on_element("sup", |el| {
        let text = el.get_attribute("data-text").filter(|s| !s.is_empty());
        let url = el.get_attribute("data-url").filter(|s| !s.is_empty());
        let numero = el.get_attribute("data-numero").filter(|s| !s.is_empty());

        if let (Some(text), Some(url), Some(numero)) = (text, url, numero) {
            references.insert(numero, text, url);
        }
    });
    rewriter.rewrite(html);
    drop(rewriter);

    log::debug!("collected {} references", references.len());
    references
}

/// Render the bibliography for the footnotes in `html`.
///
/// Returns the empty string when `html` has no footnotes, meaning the slot
/// should be left out entirely.
pub fn extract_references(html: &str) -> String {
    collect_references(html).to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sup(numero: &str, text: &str, url: &str) -> String {
        format!(
            r#"<sup data-text="{}" data-url="{}" data-draft-node="inline" data-draft-type="reference" data-numero="{}">[{}]</sup>"#,
            text, url, numero, numero
        )
    }

    #[test]
    fn test_numeric_ordering() {
        let html = format!(
            "<p>a{}b{}c{}</p>",
            sup("2", "Two", "https://two.example"),
            sup("10", "Ten", "https://ten.example"),
            sup("1", "One", "https://one.example"),
        );
        let refs = collect_references(&html);
        let keys: Vec<&str> = refs.sorted().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "10"]);

        let block = refs.to_html();
        let one = block.find("1. One").unwrap();
        let two = block.find("2. Two").unwrap();
        let ten = block.find("10. Ten").unwrap();
        assert!(one < two && two < ten);
    }

    #[test]
    fn test_last_write_wins() {
        let html = format!(
            "{}{}",
            sup("1", "First", "https://a.example"),
            sup("1", "Second", "https://b.example")
        );
        let refs = collect_references(&html);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs.get("1").unwrap().text, "Second");

        let block = refs.to_html();
        assert!(block.contains("1. Second"));
        assert!(!block.contains("First"));
    }

    #[test]
    fn test_empty_is_empty_string() {
        assert_eq!(extract_references("<p>no footnotes <sup>2</sup></p>"), "");
        assert_eq!(extract_references(""), "");
    }

    #[test]
    fn test_incomplete_markers_ignored() {
        let html = r#"<sup data-text="x" data-numero="1">[1]</sup><sup data-text="" data-url="u" data-numero="2">[2]</sup>"#;
        assert!(collect_references(html).is_empty());
    }

    #[test]
    fn test_block_format() {
        let html = sup("1", "Rust Book", "https://doc.rust-lang.org/book/");
        assert_eq!(
            extract_references(&html),
            "<hr><section><h2>参考</h2>1. Rust Book <a href=\"https://doc.rust-lang.org/book/\">https://doc.rust-lang.org/book/</a></section>"
        );
    }

    #[test]
    fn test_entries_joined_with_line_breaks() {
        let html = format!("{}{}", sup("1", "A", "u1"), sup("2", "B", "u2"));
        let block = extract_references(&html);
        assert!(block.contains("<a href=\"u1\">u1</a><br>2. B"));
    }

    #[test]
    fn test_non_numeric_keys_sort_last() {
        let mut refs = References::new();
        refs.insert("b", "x", "u");
        refs.insert("3", "y", "u");
        refs.insert("a", "z", "u");
        let keys: Vec<&str> = refs.sorted().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["3", "b", "a"]);
    }

    #[test]
    fn test_extraction_does_not_change_input_handling() {
        let html = format!("<p>{}</p>", sup("1", "A", "u"));
        let refs = collect_references(&html);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_decoded_attributes_are_escaped() {
        let html = r#"<sup data-text="a &lt;img src=x onerror=alert(1)&gt; &amp; b" data-url="https://x.org/?a=1&amp;b=&quot;2&quot;" data-numero="1">[1]</sup>"#;
        let refs = collect_references(html);
        assert_eq!(refs.get("1").unwrap().text, "a <img src=x onerror=alert(1)> & b");

        assert_eq!(
            refs.to_html(),
            "<hr><section><h2>参考</h2>1. a &lt;img src=x onerror=alert(1)&gt; &amp; b \
             <a href=\"https://x.org/?a=1&amp;b=&quot;2&quot;\">https://x.org/?a=1&amp;b=\"2\"</a></section>"
        );
    }
}
