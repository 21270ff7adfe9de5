//! Rendering of structured article content to HTML.

mod html;
mod json;
pub mod marks;
mod options;
mod result;
pub mod visitor;

pub use html::{
    render_segment, render_segments, render_segments_with_result, render_video, SegmentRenderer,
};
pub use json::{to_json, JsonFormat};
pub use marks::{resolve_marks, FootnoteCounter};
pub use options::{ErrorMode, RenderOptions};
pub use result::{RenderResult, RenderStats, SegmentIssue};
pub use visitor::{
    CompositeVisitor, DefaultVisitor, MaxHeadingLevelVisitor, SegmentVisitor, SkipImagesVisitor,
    VisitorAction,
};
