//! Mark resolution: turn a [`TextRun`] into inline HTML.
//!
//! Every mark contributes an opening fragment at its start offset and a
//! closing fragment at its end offset. Openers queue behind fragments
//! already at that offset; closers jump ahead of them. With marks sorted by
//! start this closes an earlier mark before a later one opens at the same
//! offset, and closes inner marks before outer ones that end together.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::model::{Mark, MarkKind, TextRun};

/// Formula images are drawn this much wider than upstream reports.
pub const FORMULA_WIDTH_SCALE: f64 = 1.2;

/// Formulas at least this tall are displayed as blocks.
pub const FORMULA_DISPLAY_HEIGHT: f64 = 28.0;

/// Counts citations per footnote so each gets a unique anchor id.
#[derive(Debug, Clone, Default)]
pub struct FootnoteCounter {
    seen: HashMap<u32, u32>,
}

impl FootnoteCounter {
    /// Create a counter with no citations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the occurrence number for the next citation of `index`.
    pub fn next(&mut self, index: u32) -> u32 {
        let count = self.seen.entry(index).or_insert(0);
        let n = *count;
        *count += 1;
        n
    }

    /// Total citations seen.
    pub fn total(&self) -> u32 {
        self.seen.values().sum()
    }
}

struct Fragment {
    html: String,
    /// +1 when the fragment opens an attribute value, -1 when it closes one
    attr_depth: i32,
}

/// Resolve marks into HTML with a fresh footnote counter.
pub fn resolve_marks(run: &TextRun, line_breaks: bool) -> String {
    resolve_marks_with(run, line_breaks, &mut FootnoteCounter::new())
}

/// Resolve marks into HTML, numbering footnote anchors with `footnotes`.
///
/// Text between fragments is escaped. When `line_breaks` is set, newlines
/// in the text become `<br>`.
pub fn resolve_marks_with(
    run: &TextRun,
    line_breaks: bool,
    footnotes: &mut FootnoteCounter,
) -> String {
    let text = run.text.as_str();
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    let mut marks: Vec<&Mark> = run.marks.iter().collect();
    marks.sort_by_key(|m| m.start);

    let mut fragments: BTreeMap<usize, VecDeque<Fragment>> = BTreeMap::new();
    for mark in marks {
        let start = mark.start.min(char_len);
        let end = mark.end.min(char_len);
        if start >= end {
            continue;
        }
        let Some((open, close)) = mark_fragments(&mark.kind, footnotes) else {
            continue;
        };
        fragments.entry(start).or_default().push_back(open);
        fragments.entry(end).or_default().push_front(close);
    }

    let mut out = String::with_capacity(text.len() + fragments.len() * 16);
    let mut cursor = 0;
    let mut attr_depth = 0;
    for (offset, queue) in fragments {
        push_text(
            &mut out,
            &text[boundaries[cursor]..boundaries[offset]],
            attr_depth > 0,
            line_breaks,
        );
        for fragment in queue {
            out.push_str(&fragment.html);
            attr_depth += fragment.attr_depth;
        }
        cursor = offset;
    }
    push_text(&mut out, &text[boundaries[cursor]..], attr_depth > 0, line_breaks);
    out
}

fn push_text(out: &mut String, text: &str, in_attribute: bool, line_breaks: bool) {
    if text.is_empty() {
        return;
    }
    if in_attribute {
        out.push_str(&html_escape::encode_double_quoted_attribute(text));
        return;
    }
    let escaped = html_escape::encode_text(text);
    if line_breaks && escaped.contains('\n') {
        out.push_str(&escaped.replace('\n', "<br>"));
    } else {
        out.push_str(&escaped);
    }
}

fn mark_fragments(kind: &MarkKind, footnotes: &mut FootnoteCounter) -> Option<(Fragment, Fragment)> {
    let pair = match kind {
        MarkKind::Bold => (plain("<strong>"), plain("</strong>")),
        MarkKind::Italic => (plain("<em>"), plain("</em>")),
        MarkKind::Link { href } => {
            if href.is_empty() {
                return None;
            }
            (
                plain(format!(
                    "<a href=\"{}\">",
                    html_escape::encode_double_quoted_attribute(href)
                )),
                plain("</a>"),
            )
        }
        MarkKind::Reference { index } => {
            let n = footnotes.next(*index);
            (
                plain(format!(
                    "<sup><a id=\"ref_{index}_{n}\" href=\"#ref_{index}\">"
                )),
                plain("</a></sup>"),
            )
        }
        MarkKind::Formula {
            img_url,
            width,
            height,
        } => {
            let class = if *height >= FORMULA_DISPLAY_HEIGHT {
                "formula-display"
            } else {
                "formula-inline"
            };
            (
                Fragment {
                    html: format!(
                        "<img class=\"{}\" src=\"{}\" alt=\"",
                        class,
                        html_escape::encode_double_quoted_attribute(img_url)
                    ),
                    attr_depth: 1,
                },
                Fragment {
                    html: format!("\" width=\"{}\"/>", format_width(*width)),
                    attr_depth: -1,
                },
            )
        }
    };
    Some(pair)
}

fn plain(html: impl Into<String>) -> Fragment {
    Fragment {
        html: html.into(),
        attr_depth: 0,
    }
}

/// Scaled formula width, rounded to two decimals.
fn format_width(width: f64) -> String {
    let scaled = (width * FORMULA_WIDTH_SCALE * 100.0).round() / 100.0;
    format!("{}", scaled)
}
