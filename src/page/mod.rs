//! Page assembly: turn an upstream payload into a standalone HTML page
//! carrying Open Graph metadata for link previews.
//!
//! # Example
//!
//! ```
//! use fxzhihu::page::{ContentKind, PageOptions, PageRegistry};
//!
//! fn main() -> fxzhihu::Result<()> {
//!     let registry = PageRegistry::with_defaults();
//!     let payload = r#"{"id": 1, "title": "Why Rust?", "detail": "<p>...</p>", "excerpt": "..."}"#;
//!     let html = registry.build(ContentKind::Question, "1", payload, &PageOptions::default())?;
//!     assert!(html.contains("og:title"));
//!     Ok(())
//! }
//! ```

mod answer;
mod article;
mod error_page;
mod pin;
mod question;
mod template;

pub use answer::{answer_page, AnswerPage};
pub use article::{article_page, ArticlePage};
pub use error_page::error_page;
pub use pin::{pin_page, PinPage};
pub use question::{question_page, QuestionPage};
pub use template::Template;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::render::RenderOptions;

/// Site name shown in titles and `og:site_name`.
pub const SITE_NAME: &str = "FxZhihu";

/// Kinds of upstream content that have a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Answer to a question
    Answer,
    /// Column article
    Article,
    /// Question
    Question,
    /// Short status post
    Pin,
}

impl ContentKind {
    /// All kinds.
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Answer,
        ContentKind::Article,
        ContentKind::Question,
        ContentKind::Pin,
    ];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Answer => "answer",
            ContentKind::Article => "article",
            ContentKind::Question => "question",
            ContentKind::Pin => "pin",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "answer" => Ok(ContentKind::Answer),
            "article" | "p" => Ok(ContentKind::Article),
            "question" => Ok(ContentKind::Question),
            "pin" | "status" => Ok(ContentKind::Pin),
            _ => Err(Error::UnknownContentKind(s.to_string())),
        }
    }
}

/// Options for page assembly.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Send human visitors on to the original page
    pub redirect: bool,

    /// Options for structured article bodies
    pub render: RenderOptions,
}

impl PageOptions {
    /// Create new page options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the redirect script.
    pub fn with_redirect(mut self, redirect: bool) -> Self {
        self.redirect = redirect;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            redirect: true,
            render: RenderOptions::default(),
        }
    }
}

/// Builds the page for one content kind.
pub trait PageBuilder: Send + Sync {
    /// The kind this builder handles.
    fn kind(&self) -> ContentKind;

    /// Build a page from the upstream JSON payload.
    fn build(&self, id: &str, payload: &str, options: &PageOptions) -> Result<String>;
}

/// Registry mapping content kinds to page builders.
pub struct PageRegistry {
    builders: HashMap<ContentKind, Arc<dyn PageBuilder>>,
}

impl PageRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Create a registry with builders for every kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AnswerPage));
        registry.register(Arc::new(ArticlePage));
        registry.register(Arc::new(QuestionPage));
        registry.register(Arc::new(PinPage));
        registry
    }

    /// Register a builder, replacing any earlier one for the same kind.
    pub fn register(&mut self, builder: Arc<dyn PageBuilder>) {
        self.builders.insert(builder.kind(), builder);
    }

    /// Get the builder for a kind.
    pub fn get(&self, kind: ContentKind) -> Option<Arc<dyn PageBuilder>> {
        self.builders.get(&kind).cloned()
    }

    /// Check if a kind has a builder.
    pub fn supports(&self, kind: ContentKind) -> bool {
        self.builders.contains_key(&kind)
    }

    /// Build a page with the registered builder.
    pub fn build(
        &self,
        kind: ContentKind,
        id: &str,
        payload: &str,
        options: &PageOptions,
    ) -> Result<String> {
        let builder = self
            .get(kind)
            .ok_or_else(|| Error::UnknownContentKind(kind.to_string()))?;
        log::debug!("building {} page for {}", kind, id);
        builder.build(id, payload, options)
    }
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Metadata shared by every page head.
pub(crate) struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub image: Option<&'a str>,
    pub creator: Option<&'a str>,
}

static HEAD: LazyLock<Template> = LazyLock::new(|| {
    Template::new(
        r#"<head>
    <meta charset="UTF-8">
    <title>{{title}} | FxZhihu</title>
    <meta property="og:type" content="website">
    <meta property="og:title" content="{{title}} | FxZhihu">
    <meta property="og:site_name" content="FxZhihu / Fixup Zhihu">
    <meta property="og:url" content="{{url}}">
    <meta property="og:description" content="{{description}}">
{{og_image}}    <meta name="twitter:card" content="{{twitter_card}}">
    <meta name="twitter:title" content="{{title}} | FxZhihu">
    <meta name="twitter:description" content="{{description}}">
{{twitter_creator}}    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/yue.css@0.4.0/yue.css">
    <script>
        const redirect = {{redirect}};
        if (redirect) {
            window.location.replace({{redirect_url}});
        }
    </script>
    <style>
        .origin_image { width: 100%; }
        figure { margin: 1.4em 0; }
        figure img { width: 100%; }
        img { vertical-align: middle; }
        .author { display: flex; gap: 1em; align-items: center; }
        #avatar { width: 100px; height: 100px; }
        .author > div { flex: 1; }
        a[data-draft-type="link-card"] { display: block; }
        .references { font-size: 0.85em; }
        .formula-display { display: block; text-align: center; }
    </style>
</head>"#,
    )
});

/// Render the `<head>` element.
pub(crate) fn render_head(meta: &PageMeta<'_>, options: &PageOptions) -> Result<String> {
    let image = meta.image.filter(|i| !i.is_empty());

    let mut values = HashMap::new();
    values.insert("title", escape(meta.title));
    values.insert("description", escape(meta.description));
    values.insert("url", escape(meta.url));
    values.insert(
        "og_image",
        image
            .map(|i| format!("    <meta property=\"og:image\" content=\"{}\">\n", escape(i)))
            .unwrap_or_default(),
    );
    values.insert(
        "twitter_card",
        if image.is_some() { "summary_large_image" } else { "summary" }.to_string(),
    );
    values.insert(
        "twitter_creator",
        meta.creator
            .map(|c| format!("    <meta name=\"twitter:creator\" content=\"@{}\">\n", escape(c)))
            .unwrap_or_default(),
    );
    values.insert("redirect", options.redirect.to_string());
    values.insert("redirect_url", script_string(meta.url)?);
    HEAD.render(&values)
}

/// Escape text for element content or a double-quoted attribute.
pub(crate) fn escape(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Quote `text` as a JavaScript string literal safe inside `<script>`.
pub(crate) fn script_string(text: &str) -> Result<String> {
    Ok(serde_json::to_string(text)?.replace("</", "<\\/"))
}

/// A unix timestamp as `(RFC 3339, "Www Mmm DD YYYY")`.
pub(crate) fn format_timestamp(
    kind: &str,
    field: &'static str,
    seconds: i64,
) -> Result<(String, String)> {
    let time: DateTime<Utc> = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| Error::invalid(kind, field, format!("timestamp {} out of range", seconds)))?;
    Ok((
        time.to_rfc3339_opts(SecondsFormat::Millis, true),
        time.format("%a %b %d %Y").to_string(),
    ))
}

/// `"{up} 👍 / {comments} 💬"`
pub(crate) fn format_stats(up_votes: u64, comments: u64) -> String {
    format!("{} 👍 / {} 💬", up_votes, comments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_from_str() {
        assert_eq!("answer".parse::<ContentKind>().unwrap(), ContentKind::Answer);
        assert_eq!("Article".parse::<ContentKind>().unwrap(), ContentKind::Article);
        assert_eq!("status".parse::<ContentKind>().unwrap(), ContentKind::Pin);
        let err = "zvideo".parse::<ContentKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownContentKind(ref k) if k == "zvideo"));
    }

    #[test]
    fn test_content_kind_round_trip_names() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.as_str().parse::<ContentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = PageRegistry::with_defaults();
        for kind in ContentKind::ALL {
            assert!(registry.supports(kind));
        }
        assert!(!PageRegistry::new().supports(ContentKind::Answer));
    }

    #[test]
    fn test_page_options_builder() {
        let options = PageOptions::new()
            .with_redirect(false)
            .with_render_options(RenderOptions::new().strict());
        assert!(!options.redirect);
        assert!(options.render.is_strict());
        assert!(PageOptions::default().redirect);
    }

    #[test]
    fn test_format_timestamp() {
        let (iso, human) = format_timestamp("answer", "created_time", 1_700_000_000).unwrap();
        assert_eq!(iso, "2023-11-14T22:13:20.000Z");
        assert_eq!(human, "Tue Nov 14 2023");
        assert!(format_timestamp("answer", "created_time", i64::MAX).is_err());
    }

    #[test]
    fn test_script_string() {
        assert_eq!(
            script_string("https://x.org/\"</script>").unwrap(),
            r#""https://x.org/\"<\/script>""#
        );
    }

    #[test]
    fn test_head_metadata() {
        let meta = PageMeta {
            title: "A \"quoted\" title",
            description: "d",
            url: "https://www.zhihu.com/question/1",
            image: None,
            creator: None,
        };
        let head = render_head(&meta, &PageOptions::default().with_redirect(false)).unwrap();
        assert!(head.contains(r#"content="A &quot;quoted&quot; title | FxZhihu""#));
        assert!(head.contains("const redirect = false;"));
        assert!(head.contains(r#"window.location.replace("https://www.zhihu.com/question/1")"#));
        assert!(head.contains(r#"content="summary""#));
        assert!(!head.contains("og:image"));
    }
}
