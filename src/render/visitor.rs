//! Visitor hooks for customizing segment rendering.
//!
//! A visitor is consulted before each segment is rendered and may let the
//! default rendering run, replace it, or drop the segment.
//!
//! # Example
//!
//! ```
//! use fxzhihu::model::ImageSegment;
//! use fxzhihu::render::visitor::{SegmentVisitor, VisitorAction};
//!
//! struct LazyImages;
//!
//! impl SegmentVisitor for LazyImages {
//!     fn visit_image(&mut self, image: &ImageSegment) -> VisitorAction {
//!         match image.url() {
//!             Some(url) => VisitorAction::Replace(format!("<img loading=\"lazy\" src=\"{}\"/>", url)),
//!             None => VisitorAction::Skip,
//!         }
//!     }
//! }
//! ```

use crate::model::{CodeBlock, ImageSegment, Segment, TextRun, VideoSegment};

use super::marks::resolve_marks;

/// Action returned by visitor methods to control rendering behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Continue with default rendering.
    #[default]
    Continue,

    /// Replace the segment with custom HTML.
    Replace(String),

    /// Skip this segment entirely (produce no output).
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the segment should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action provides replacement content.
    pub fn is_replace(&self) -> bool {
        matches!(self, VisitorAction::Replace(_))
    }

    /// Get replacement content if available.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            VisitorAction::Replace(s) => Some(s),
            _ => None,
        }
    }
}

/// Trait for visiting segments during rendering.
///
/// All methods return `VisitorAction::Continue` by default.
/// [`visit_segment`](SegmentVisitor::visit_segment) dispatches to the
/// per-kind methods; override it to see every segment.
pub trait SegmentVisitor: Send + Sync {
    /// Called before rendering any segment.
    fn visit_segment(&mut self, index: usize, segment: &Segment) -> VisitorAction {
        let _ = index;
        match segment {
            Segment::Paragraph(run) => self.visit_paragraph(run),
            Segment::Heading { level, run } => self.visit_heading(run, *level),
            Segment::Image(image) => self.visit_image(image),
            Segment::Video(video) => self.visit_video(video),
            Segment::CodeBlock(code) => self.visit_code_block(code),
            Segment::Unknown { kind, text } => self.visit_unknown(kind, text.as_deref()),
            _ => VisitorAction::Continue,
        }
    }

    /// Called before rendering a paragraph.
    fn visit_paragraph(&mut self, run: &TextRun) -> VisitorAction {
        let _ = run;
        VisitorAction::Continue
    }

    /// Called before rendering a heading.
    fn visit_heading(&mut self, run: &TextRun, level: u8) -> VisitorAction {
        let _ = (run, level);
        VisitorAction::Continue
    }

    /// Called before rendering an image.
    fn visit_image(&mut self, image: &ImageSegment) -> VisitorAction {
        let _ = image;
        VisitorAction::Continue
    }

    /// Called before rendering a video.
    fn visit_video(&mut self, video: &VideoSegment) -> VisitorAction {
        let _ = video;
        VisitorAction::Continue
    }

    /// Called before rendering a code block.
    fn visit_code_block(&mut self, code: &CodeBlock) -> VisitorAction {
        let _ = code;
        VisitorAction::Continue
    }

    /// Called before rendering a segment of unknown kind.
    fn visit_unknown(&mut self, kind: &str, text: Option<&str>) -> VisitorAction {
        let _ = (kind, text);
        VisitorAction::Continue
    }

    /// Called once before the first segment.
    fn on_document_start(&mut self, segment_count: usize) {
        let _ = segment_count;
    }

    /// Called once after the last segment.
    fn on_document_end(&mut self) {}
}

/// Default visitor that performs no customization.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl SegmentVisitor for DefaultVisitor {}

/// Visitor that drops all images.
#[derive(Debug, Clone, Default)]
pub struct SkipImagesVisitor;

impl SegmentVisitor for SkipImagesVisitor {
    fn visit_image(&mut self, _image: &ImageSegment) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Visitor that caps heading depth.
#[derive(Debug, Clone)]
pub struct MaxHeadingLevelVisitor {
    max_level: u8,
}

impl MaxHeadingLevelVisitor {
    /// Create a visitor that limits headings to the specified max level.
    pub fn new(max_level: u8) -> Self {
        Self {
            max_level: max_level.clamp(1, 6),
        }
    }
}

impl SegmentVisitor for MaxHeadingLevelVisitor {
    fn visit_heading(&mut self, run: &TextRun, level: u8) -> VisitorAction {
        if level <= self.max_level {
            return VisitorAction::Continue;
        }
        let level = self.max_level;
        VisitorAction::Replace(format!(
            "<h{}>{}</h{}>",
            level,
            resolve_marks(run, true),
            level
        ))
    }
}

/// Composite visitor that chains multiple visitors.
///
/// Visitors are called in order. The first visitor that returns
/// a non-Continue action determines the result.
#[derive(Default)]
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn SegmentVisitor>>,
}

impl CompositeVisitor {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visitor to the chain.
    pub fn with_visitor<V: SegmentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }
}

impl SegmentVisitor for CompositeVisitor {
    fn visit_segment(&mut self, index: usize, segment: &Segment) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visitor.visit_segment(index, segment);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }

    fn on_document_start(&mut self, segment_count: usize) {
        for visitor in &mut self.visitors {
            visitor.on_document_start(segment_count);
        }
    }

    fn on_document_end(&mut self) {
        for visitor in &mut self.visitors {
            visitor.on_document_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> Segment {
        Segment::Image(ImageSegment {
            urls: vec!["a.jpg".into()],
            width: 0,
            height: 0,
            description: None,
        })
    }

    #[test]
    fn test_visitor_action_default() {
        assert_eq!(VisitorAction::default(), VisitorAction::Continue);
    }

    #[test]
    fn test_visitor_action_helpers() {
        assert!(VisitorAction::Skip.should_skip());
        assert!(!VisitorAction::Continue.should_skip());
        assert!(VisitorAction::Replace("x".into()).is_replace());
        assert_eq!(VisitorAction::Replace("x".into()).replacement(), Some("x"));
        assert!(VisitorAction::Skip.replacement().is_none());
    }

    #[test]
    fn test_skip_images_visitor() {
        let mut visitor = SkipImagesVisitor;
        assert!(visitor.visit_segment(0, &image()).should_skip());
        let para = Segment::Paragraph(TextRun::new("x"));
        assert_eq!(visitor.visit_segment(1, &para), VisitorAction::Continue);
    }

    #[test]
    fn test_max_heading_level_visitor() {
        let mut visitor = MaxHeadingLevelVisitor::new(2);
        let deep = Segment::Heading {
            level: 4,
            run: TextRun::new("Deep & low"),
        };
        assert_eq!(
            visitor.visit_segment(0, &deep).replacement(),
            Some("<h2>Deep &amp; low</h2>")
        );

        let shallow = Segment::Heading {
            level: 1,
            run: TextRun::new("Top"),
        };
        assert_eq!(visitor.visit_segment(1, &shallow), VisitorAction::Continue);
    }

    #[test]
    fn test_composite_visitor() {
        let mut composite = CompositeVisitor::new()
            .with_visitor(DefaultVisitor)
            .with_visitor(SkipImagesVisitor);

        assert!(composite.visit_segment(0, &image()).should_skip());
        assert_eq!(
            composite.visit_segment(1, &Segment::HorizontalRule),
            VisitorAction::Continue
        );
    }
}
