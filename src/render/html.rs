//! HTML rendering for structured article content.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::error::Result;
use crate::model::{
    CardSegment, CodeBlock, ContentDocument, ImageSegment, ListKind, ReferenceItem, Segment,
    TextRun, VideoSegment,
};

use super::marks::{resolve_marks_with, FootnoteCounter};
use super::visitor::{SegmentVisitor, VisitorAction};
use super::{RenderOptions, RenderResult, RenderStats, SegmentIssue};

/// Render a document to HTML.
pub fn render_segments(doc: &ContentDocument, options: &RenderOptions) -> Result<String> {
    SegmentRenderer::new(options.clone()).render(doc)
}

/// Render a document to HTML with statistics and recovered failures.
pub fn render_segments_with_result(
    doc: &ContentDocument,
    options: &RenderOptions,
) -> Result<RenderResult> {
    SegmentRenderer::new(options.clone()).render_with_result(doc)
}

/// Render one segment with default options.
pub fn render_segment(segment: &Segment) -> String {
    let mut out = String::new();
    SegmentRenderer::new(RenderOptions::default()).render_segment(&mut out, segment);
    out
}

/// Render a video block.
///
/// Also used for answers that carry a video attachment.
pub fn render_video(video: &VideoSegment) -> String {
    let src = video
        .url
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| format!("https://www.zhihu.com/video/{}", video.video_id));

    let mut out = format!("<video controls src=\"{}\"", attr(&src));
    if let Some(poster) = video.thumbnail.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!(" poster=\"{}\"", attr(poster)));
    }
    if let Some(title) = video.title.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!(" title=\"{}\"", attr(title)));
    }
    out.push_str("></video>");
    out
}

/// HTML renderer for [`ContentDocument`]s.
pub struct SegmentRenderer {
    options: RenderOptions,
    stats: RenderStats,
    issues: Vec<SegmentIssue>,
    footnotes: FootnoteCounter,
    visitor: Option<Box<dyn SegmentVisitor>>,
}

impl SegmentRenderer {
    /// Create a new renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: RenderStats::new(),
            issues: Vec::new(),
            footnotes: FootnoteCounter::new(),
            visitor: None,
        }
    }

    /// Consult `visitor` before each segment.
    pub fn with_visitor<V: SegmentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitor = Some(Box::new(visitor));
        self
    }

    /// Render a document to HTML.
    pub fn render(mut self, doc: &ContentDocument) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document, returning statistics and skipped segments too.
    pub fn render_with_result(mut self, doc: &ContentDocument) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(doc)?;
        Ok(RenderResult::new(content, self.stats, self.issues))
    }

    fn render_internal(&mut self, doc: &ContentDocument) -> Result<String> {
        let mut output = String::new();

        if let Some(visitor) = self.visitor.as_mut() {
            visitor.on_document_start(doc.len());
        }

        for (index, raw) in doc.segments.iter().enumerate() {
            let segment = match raw.decode() {
                Ok(segment) => segment,
                Err(e) if self.options.is_strict() => return Err(e),
                Err(e) => {
                    log::warn!("skipping segment {} ({}): {}", index, raw.kind, e);
                    self.stats.add_skipped();
                    self.issues.push(SegmentIssue {
                        index,
                        kind: raw.kind.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let action = match self.visitor.as_mut() {
                Some(visitor) => visitor.visit_segment(index, &segment),
                None => VisitorAction::Continue,
            };
            match action {
                VisitorAction::Skip => continue,
                VisitorAction::Replace(html) => output.push_str(&html),
                VisitorAction::Continue => self.render_segment(&mut output, &segment),
            }

            if self.options.collect_stats {
                self.stats.add_segment(&segment);
            }
        }

        if let Some(visitor) = self.visitor.as_mut() {
            visitor.on_document_end();
        }

        log::debug!(
            "rendered {} segments, skipped {}",
            doc.len() - self.issues.len(),
            self.issues.len()
        );
        Ok(output)
    }

    /// Render a single decoded segment.
    pub fn render_segment(&mut self, output: &mut String, segment: &Segment) {
        match segment {
            Segment::Paragraph(run) => self.wrap(output, "p", run),
            Segment::Heading { level, run } => {
                let tag = format!("h{}", (*level).clamp(1, 6));
                self.wrap(output, &tag, run);
            }
            Segment::Blockquote(run) => self.wrap(output, "blockquote", run),
            Segment::Image(image) => render_image(output, image),
            Segment::Card(card) => render_card(output, card),
            Segment::Video(video) => output.push_str(&render_video(video)),
            Segment::CodeBlock(code) => render_code_block(output, code),
            Segment::List { kind, items } => self.render_list(output, *kind, items),
            Segment::HorizontalRule => output.push_str("<hr>"),
            Segment::ReferenceBlock { items } => render_reference_block(output, items),
            Segment::Unknown { kind, text: body } => {
                output.push_str("<p>");
                match body {
                    Some(body) => output.push_str(&text(body)),
                    None => {
                        log::warn!("segment of unknown kind {:?} has no text", kind);
                        output.push_str(&format!("[{}]", text(kind)));
                    }
                }
                output.push_str("</p>");
            }
        }
    }

    fn inline(&mut self, run: &TextRun) -> String {
        resolve_marks_with(run, self.options.line_breaks, &mut self.footnotes)
    }

    fn wrap(&mut self, output: &mut String, tag: &str, run: &TextRun) {
        let inner = self.inline(run);
        output.push('<');
        output.push_str(tag);
        output.push('>');
        output.push_str(&inner);
        output.push_str("</");
        output.push_str(tag);
        output.push('>');
    }

    fn render_list(&mut self, output: &mut String, kind: ListKind, items: &[TextRun]) {
        let tag = match kind {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        };
        output.push_str(&format!("<{}>", tag));
        for item in items {
            self.wrap(output, "li", item);
        }
        output.push_str(&format!("</{}>", tag));
    }
}

fn render_image(output: &mut String, image: &ImageSegment) {
    let Some(url) = image.url() else {
        return;
    };
    let mut img = format!("<img src=\"{}\"", attr(url));
    if image.width > 0 {
        img.push_str(&format!(" data-rawwidth=\"{}\"", image.width));
    }
    if image.height > 0 {
        img.push_str(&format!(" data-rawheight=\"{}\"", image.height));
    }

    match image.description.as_deref().filter(|d| !d.is_empty()) {
        Some(caption) => {
            output.push_str(&format!(
                "<figure>{} alt=\"{}\"/><figcaption>{}</figcaption></figure>",
                img,
                attr(caption),
                text(caption)
            ));
        }
        None => {
            output.push_str(&img);
            output.push_str("/>");
        }
    }
}

fn render_card(output: &mut String, card: &CardSegment) {
    let title = card
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&card.url);
    output.push_str(&format!(
        "<a href=\"{}\" data-draft-type=\"link-card\">{}</a>",
        attr(&card.url),
        text(title)
    ));
}

fn render_code_block(output: &mut String, code: &CodeBlock) {
    match code.language.as_deref().filter(|l| !l.is_empty()) {
        Some(lang) => output.push_str(&format!("<pre><code class=\"{}\">", attr(lang))),
        None => output.push_str("<pre><code>"),
    }
    output.push_str(&text(&code.content));
    output.push_str("</code></pre>");
}

fn render_reference_block(output: &mut String, items: &[ReferenceItem]) {
    output.push_str("<ol class=\"references\">");
    for item in items {
        output.push_str(&format!(
            "<li id=\"ref_{}\"><a href=\"#ref_{}_0\">^</a> {}",
            item.index,
            item.index,
            text(&item.text)
        ));
        if let Some(url) = item.url.as_deref().filter(|u| !u.is_empty()) {
            output.push_str(&format!(" <a href=\"{}\">{}</a>", attr(url), text(url)));
        }
        output.push_str("</li>");
    }
    output.push_str("</ol>");
}
