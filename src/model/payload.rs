//! Upstream API payloads, trimmed to the fields the pages use.

use serde::{Deserialize, Serialize};

use super::document::ContentDocument;
use super::segment::VideoSegment;

/// An answer to a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Body HTML
    pub content: String,

    /// Plain-text summary
    #[serde(default)]
    pub excerpt: String,

    /// Who wrote it
    pub author: AnswerAuthor,

    /// Upvotes
    #[serde(default)]
    pub voteup_count: u64,

    /// Comments
    #[serde(default)]
    pub comment_count: u64,

    /// The question being answered
    pub question: QuestionRef,

    /// Unix seconds
    pub created_time: i64,

    /// Optional media attached to the answer
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

/// Answer author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerAuthor {
    /// Display name
    pub name: String,
}

/// The question an answer belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRef {
    /// Question id
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    /// Question title
    pub title: String,
}

/// Media attached to an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment type, `video` for the only one rendered
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Video details
    #[serde(default)]
    pub video: Option<VideoSegment>,
}

/// A column article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Title
    pub header: ArticleHeader,

    /// Body segments
    pub structured_content: ContentDocument,

    /// Plain-text summary
    #[serde(default)]
    pub excerpt: String,

    /// Who wrote it
    pub author: ArticleAuthor,

    /// Footer info
    #[serde(default)]
    pub content_end_info: Option<ContentEndInfo>,

    /// Reactions
    #[serde(default)]
    pub reaction: Option<ArticleReaction>,

    /// Header image
    #[serde(default)]
    pub cover_image: Option<CoverImage>,

    /// Column the article was published in
    #[serde(default)]
    pub third_business: Option<ThirdBusiness>,
}

/// Article title holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleHeader {
    /// Title text
    pub text: String,
}

/// Article author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleAuthor {
    /// Display name
    pub fullname: String,

    /// Headline
    #[serde(default)]
    pub description: String,

    /// Avatar and profile link
    #[serde(default)]
    pub avatar: Option<ArticleAvatar>,
}

/// Avatar wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleAvatar {
    /// Image data
    pub avatar_image: AvatarImage,
}

/// Avatar image and profile link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarImage {
    /// Daytime avatar URL
    #[serde(default)]
    pub day: String,

    /// Profile URL
    #[serde(default)]
    pub jump_url: String,
}

/// Article footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEndInfo {
    /// Human-readable creation time, already formatted upstream
    #[serde(default)]
    pub create_time_text: String,
}

/// Article reaction wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleReaction {
    /// Counters
    pub statistics: ReactionStatistics,
}

/// Article counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionStatistics {
    /// Upvotes
    #[serde(default)]
    pub up_vote_count: u64,

    /// Comments
    #[serde(default)]
    pub comment_count: u64,
}

/// Cover image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverImage {
    /// Image URL
    pub url: String,
}

/// Publication context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirdBusiness {
    /// Column, when the article belongs to one
    #[serde(default)]
    pub column: Option<Column>,
}

/// A column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub title: String,

    /// Column description
    #[serde(default)]
    pub description: String,
}

/// A question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Question id
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    /// Title
    pub title: String,

    /// Description HTML
    #[serde(default)]
    pub detail: String,

    /// Plain-text summary
    #[serde(default)]
    pub excerpt: String,
}

/// A pin (short status post).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    /// Pin id
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    /// Body HTML
    #[serde(default)]
    pub content_html: String,

    /// Plain-text summary
    #[serde(default)]
    pub excerpt_title: String,

    /// Who posted it
    pub author: PinAuthor,

    /// Unix seconds
    pub created: i64,

    /// Unix seconds
    #[serde(default)]
    pub updated: Option<i64>,

    /// Reactions
    #[serde(default)]
    pub reaction: Option<PinReaction>,

    /// Header image
    #[serde(default)]
    pub image_url: Option<String>,

    /// The pin this one reposts
    #[serde(default)]
    pub origin_pin: Option<Box<Pin>>,
}

/// Pin author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinAuthor {
    /// Display name
    pub name: String,

    /// API profile URL
    #[serde(default)]
    pub url: String,

    /// Headline
    #[serde(default)]
    pub headline: String,

    /// Avatar URL
    #[serde(default)]
    pub avatar_url: String,
}

impl PinAuthor {
    /// Public profile URL; the API hands out `api.` URLs.
    pub fn profile_url(&self) -> String {
        self.url.replacen("api.", "", 1)
    }
}

/// Pin counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinReaction {
    /// Upvotes
    #[serde(default)]
    pub up_vote_count: u64,

    /// Comments
    #[serde(default)]
    pub comment_count: u64,
}

/// Ids arrive as numbers from some endpoints and strings from others.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}
