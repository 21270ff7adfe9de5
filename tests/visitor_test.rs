//! Integration tests for segment visitors.

use std::sync::Mutex;

use fxzhihu::model::{ImageSegment, TextRun};
use fxzhihu::render::visitor::{
    CompositeVisitor, MaxHeadingLevelVisitor, SegmentVisitor, SkipImagesVisitor, VisitorAction,
};
use fxzhihu::{parse_document, RenderOptions, SegmentRenderer};

/// Custom visitor that tracks visit counts.
#[derive(Default)]
struct CountingVisitor {
    paragraph_count: usize,
    heading_count: usize,
    image_count: usize,
}

impl SegmentVisitor for CountingVisitor {
    fn visit_paragraph(&mut self, _run: &TextRun) -> VisitorAction {
        self.paragraph_count += 1;
        VisitorAction::Continue
    }

    fn visit_heading(&mut self, _run: &TextRun, _level: u8) -> VisitorAction {
        self.heading_count += 1;
        VisitorAction::Continue
    }

    fn visit_image(&mut self, _image: &ImageSegment) -> VisitorAction {
        self.image_count += 1;
        VisitorAction::Continue
    }
}

const DOC: &str = r#"[
    {"type": "heading", "heading": {"level": 4, "text": "Intro"}},
    {"type": "paragraph", "paragraph": {"text": "one"}},
    {"type": "image", "image": {"urls": ["https://pic.zhimg.com/a.jpg"]}},
    {"type": "paragraph", "paragraph": {"text": "two"}}
]"#;

#[test]
fn test_counting_visitor_sees_every_segment() {
    let doc = parse_document(DOC).unwrap();
    let mut visitor = CountingVisitor::default();
    for (i, segment) in doc.decode_lenient().iter().enumerate() {
        visitor.visit_segment(i, segment);
    }
    assert_eq!(visitor.paragraph_count, 2);
    assert_eq!(visitor.heading_count, 1);
    assert_eq!(visitor.image_count, 1);
}

#[test]
fn test_renderer_calls_lifecycle_hooks() {
    struct Probe(&'static Mutex<(Option<usize>, bool)>);

    impl SegmentVisitor for Probe {
        fn on_document_start(&mut self, segment_count: usize) {
            self.0.lock().unwrap().0 = Some(segment_count);
        }

        fn on_document_end(&mut self) {
            self.0.lock().unwrap().1 = true;
        }
    }

    static STATE: Mutex<(Option<usize>, bool)> = Mutex::new((None, false));

    let doc = parse_document(DOC).unwrap();
    SegmentRenderer::new(RenderOptions::default())
        .with_visitor(Probe(&STATE))
        .render(&doc)
        .unwrap();

    let state = STATE.lock().unwrap();
    assert_eq!(state.0, Some(4));
    assert!(state.1);
}

#[test]
fn test_replace_action_is_used_verbatim() {
    struct Redact;

    impl SegmentVisitor for Redact {
        fn visit_paragraph(&mut self, run: &TextRun) -> VisitorAction {
            if run.text == "two" {
                VisitorAction::Replace("<p>[redacted]</p>".into())
            } else {
                VisitorAction::Continue
            }
        }
    }

    let doc = parse_document(DOC).unwrap();
    let html = SegmentRenderer::new(RenderOptions::default())
        .with_visitor(Redact)
        .render(&doc)
        .unwrap();
    assert!(html.contains("<p>one</p>"));
    assert!(html.ends_with("<p>[redacted]</p>"));
}

#[test]
fn test_composite_visitor_chain() {
    let doc = parse_document(DOC).unwrap();
    let visitor = CompositeVisitor::new()
        .with_visitor(SkipImagesVisitor)
        .with_visitor(MaxHeadingLevelVisitor::new(2));
    let html = SegmentRenderer::new(RenderOptions::default())
        .with_visitor(visitor)
        .render(&doc)
        .unwrap();
    assert_eq!(html, "<h2>Intro</h2><p>one</p><p>two</p>");
}
