//! Streaming HTML rewriter.
//!
//! A single forward scan over the markup that dispatches on tag name. Handlers
//! can edit attributes, unwrap elements and replace the text directly inside
//! an element. Everything no handler touches is copied through byte for byte,
//! and malformed input is passed through instead of failing.
//!
//! # Example
//!
//! ```
//! use fxzhihu::rewriter::HtmlRewriter;
//!
//! let mut rewriter = HtmlRewriter::new()
//!     .on_element("b", |el| el.remove_and_keep_content())
//!     .on_element("a", |el| el.set_attribute("rel", "nofollow"));
//!
//! let out = rewriter.rewrite(r#"<p><b>hi</b> <a href="/x">x</a></p>"#);
//! assert_eq!(out, r#"<p>hi <a href="/x" rel="nofollow">x</a></p>"#);
//! ```

mod element;
mod scan;

pub use element::{Attribute, Element, TextChunk};

use std::collections::HashMap;

use scan::{
    find_raw_text_end, find_tag_end, is_raw_text, is_void, opens_markup, parse_tag_info,
    scan_comment,
};

type ElementHandler<'h> = Box<dyn FnMut(&mut Element<'_>) + 'h>;
type TextHandler<'h> = Box<dyn FnMut(&mut TextChunk<'_>) + 'h>;

#[derive(Default)]
struct Handlers<'h> {
    element: Vec<ElementHandler<'h>>,
    text: Vec<TextHandler<'h>>,
}

/// An element whose start tag has been seen but not its end tag.
#[derive(Debug)]
struct OpenElement {
    name: String,
    unwrapped: bool,
}

/// Counters from the last rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Start tags handed to an element handler
    pub elements_matched: u32,
    /// Start tags that were re-serialized or dropped
    pub elements_modified: u32,
    /// Text chunks handed to a text handler
    pub text_chunks: u32,
}

/// Tag-name keyed rewriter.
///
/// Handlers may borrow local state for `'h`, which makes collecting data
/// during a pass straightforward.
#[derive(Default)]
pub struct HtmlRewriter<'h> {
    handlers: HashMap<String, Handlers<'h>>,
    stats: RewriteStats,
}

impl<'h> HtmlRewriter<'h> {
    /// Create a rewriter with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            stats: RewriteStats::default(),
        }
    }

    /// Register a start-tag handler for `tag` (ASCII case-insensitive).
    ///
    /// Several handlers for one tag run in registration order.
    pub fn on_element<F>(mut self, tag: &str, handler: F) -> Self
    where
        F: FnMut(&mut Element<'_>) + 'h,
    {
        self.handlers
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .element
            .push(Box::new(handler));
        self
    }

    /// Register a handler for text whose innermost enclosing element is
    /// `tag`.
    pub fn on_text<F>(mut self, tag: &str, handler: F) -> Self
    where
        F: FnMut(&mut TextChunk<'_>) + 'h,
    {
        self.handlers
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .text
            .push(Box::new(handler));
        self
    }

    /// Statistics for the most recent call to [`rewrite`](Self::rewrite).
    pub fn stats(&self) -> RewriteStats {
        self.stats
    }

    /// Run the handlers over `html` and return the rewritten markup.
    pub fn rewrite(&mut self, html: &str) -> String {
        self.stats = RewriteStats::default();
        let src = html.as_bytes();
        let n = src.len();
        let mut out = String::with_capacity(n + n / 16);
        let mut open: Vec<OpenElement> = Vec::new();
        let mut i = 0usize;

        while i < n {
            if src[i] != b'<' {
                let next_lt = memchr::memchr(b'<', &src[i..]).map_or(n, |p| i + p);
                self.emit_text(&html[i..next_lt], open.last(), &mut out);
                i = next_lt;
                continue;
            }

            if !opens_markup(src, i) {
                // Literal '<' in text.
                let next_lt = memchr::memchr(b'<', &src[i + 1..]).map_or(n, |p| i + 1 + p);
                self.emit_text(&html[i..next_lt], open.last(), &mut out);
                i = next_lt;
                continue;
            }

            if src[i..].starts_with(b"<!--") {
                let end = scan_comment(src, i).unwrap_or(n);
                out.push_str(&html[i..end]);
                i = end;
                continue;
            }

            let Some(j) = find_tag_end(src, i) else {
                out.push_str(&html[i..]);
                break;
            };
            let tag = &html[i..=j];

            if src[i + 1] == b'!' || src[i + 1] == b'?' {
                // Doctype, CDATA, processing instruction.
                out.push_str(tag);
                i = j + 1;
                continue;
            }

            let info = parse_tag_info(tag.as_bytes());
            if info.is_end {
                close_element(tag, info.name, &mut open, &mut out);
                i = j + 1;
                continue;
            }

            let name = String::from_utf8_lossy(info.name).to_ascii_lowercase();
            let unwrapped = self.open_element(tag, &info, &name, &mut out);
            i = j + 1;

            if info.self_closing || is_void(info.name) {
                continue;
            }

            if is_raw_text(info.name) {
                // Content of script/style/etc. is opaque.
                let end = find_raw_text_end(src, i, info.name).unwrap_or(n);
                out.push_str(&html[i..end]);
                i = end;
            }

            open.push(OpenElement { name, unwrapped });
        }

        log::debug!(
            "rewrite: {} bytes in, {} out, {} matched, {} modified, {} text chunks",
            n,
            out.len(),
            self.stats.elements_matched,
            self.stats.elements_modified,
            self.stats.text_chunks
        );

        out
    }

    /// Run element handlers on a start tag and write it. Returns whether the
    /// element was unwrapped.
    fn open_element(
        &mut self,
        tag: &str,
        info: &scan::TagInfo<'_>,
        name: &str,
        out: &mut String,
    ) -> bool {
        let Some(handlers) = self.handlers.get_mut(name).filter(|h| !h.element.is_empty())
        else {
            out.push_str(tag);
            return false;
        };

        let mut element = Element::parse(tag, info);
        for handler in handlers.element.iter_mut() {
            handler(&mut element);
        }

        self.stats.elements_matched += 1;
        if element.is_modified() {
            self.stats.elements_modified += 1;
        }
        element.write_to(out);
        element.is_removed()
    }

    fn emit_text(&mut self, text: &str, innermost: Option<&OpenElement>, out: &mut String) {
        let handlers = innermost
            .and_then(|e| self.handlers.get_mut(&e.name))
            .filter(|h| !h.text.is_empty());

        let Some(handlers) = handlers else {
            out.push_str(text);
            return;
        };

        let mut chunk = TextChunk::new(text);
        for handler in handlers.text.iter_mut() {
            handler(&mut chunk);
        }
        self.stats.text_chunks += 1;
        out.push_str(&chunk.into_output());
    }
}

/// Pop the innermost open element with this name, implicitly closing
/// anything opened after it. Unmatched end tags pass through.
fn close_element(tag: &str, name: &[u8], open: &mut Vec<OpenElement>, out: &mut String) {
    let Some(pos) = open
        .iter()
        .rposition(|e| e.name.as_bytes().eq_ignore_ascii_case(name))
    else {
        out.push_str(tag);
        return;
    };

    let closed = &open[pos];
    if !closed.unwrapped {
        out.push_str(tag);
    }
    open.truncate(pos);
}

/// Rewrite `html` with a one-off set of handlers.
pub fn rewrite(html: &str, mut rewriter: HtmlRewriter<'_>) -> String {
    rewriter.rewrite(html)
}
