//! Data model for upstream content.
//!
//! Structured article bodies are kept as [`RawSegment`]s until rendering so a
//! single malformed block can be skipped instead of failing the document.

mod document;
mod mark;
mod payload;
mod segment;

pub use document::ContentDocument;
pub use mark::{Mark, MarkKind, RawMark, TextRun};
pub use payload::{
    Answer, AnswerAuthor, Article, ArticleAuthor, ArticleAvatar, ArticleHeader, ArticleReaction,
    Attachment, AvatarImage, Column, ContentEndInfo, CoverImage, Pin, PinAuthor, PinReaction,
    Question, QuestionRef, ReactionStatistics, ThirdBusiness,
};
pub use segment::{
    CardSegment, CodeBlock, ImageSegment, ListKind, RawSegment, ReferenceItem, Segment,
    VideoSegment,
};
