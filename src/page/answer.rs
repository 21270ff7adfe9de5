//! Answer pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{
    escape, format_stats, format_timestamp, render_head, ContentKind, PageBuilder, PageMeta,
    PageOptions, Template,
};
use crate::error::Result;
use crate::model::Answer;
use crate::normalize::normalize;
use crate::reference::extract_references;
use crate::render::render_video;

static TEMPLATE: LazyLock<Template> = LazyLock::new(|| {
    Template::new(
        r#"<!DOCTYPE html>
<html lang="zh">
{{head}}
<body style="max-width: 1000px; margin: 0 auto; padding: 0 1em 0 1em;" class="yue">
    <header>
        <h1><a href="{{url}}">{{title}}</a></h1>
        <h2 rel="author">@{{author}}</h2>
        <time datetime="{{created_time}}">发表于 {{created_time_formatted}}</time>
        <p rel="stats" style="color: #999; font-size: 0.9em;">{{stats}}</p>
    </header>
    <article>
        {{video}}
        {{content}}
        {{reference}}
    </article>
</body>
</html>
"#,
    )
});

/// Canonical URL of an answer.
pub fn answer_url(question_id: &str, answer_id: &str) -> String {
    format!(
        "https://www.zhihu.com/question/{}/answer/{}",
        question_id, answer_id
    )
}

/// Build the page for an answer.
pub fn answer_page(id: &str, answer: &Answer, options: &PageOptions) -> Result<String> {
    let url = answer_url(&answer.question.id, id);
    let (created, created_formatted) =
        format_timestamp("answer", "created_time", answer.created_time)?;

    let video = answer
        .attachment
        .as_ref()
        .filter(|a| a.kind.is_empty() || a.kind == "video")
        .and_then(|a| a.video.as_ref())
        .map(render_video)
        .unwrap_or_default();

    let head = render_head(
        &PageMeta {
            title: &format!("{} - @{}", answer.question.title, answer.author.name),
            description: &answer.excerpt,
            url: &url,
            image: None,
            creator: Some(&answer.author.name),
        },
        options,
    )?;

    let mut values = HashMap::new();
    values.insert("head", head);
    values.insert("url", escape(&url));
    values.insert("title", escape(&answer.question.title));
    values.insert("author", escape(&answer.author.name));
    values.insert("created_time", created);
    values.insert("created_time_formatted", created_formatted);
    values.insert(
        "stats",
        format_stats(answer.voteup_count, answer.comment_count),
    );
    values.insert("video", video);
    values.insert("content", normalize(&answer.content));
    values.insert("reference", extract_references(&answer.content));
    TEMPLATE.render(&values)
}

/// [`PageBuilder`] for answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerPage;

impl PageBuilder for AnswerPage {
    fn kind(&self) -> ContentKind {
        ContentKind::Answer
    }

    fn build(&self, id: &str, payload: &str, options: &PageOptions) -> Result<String> {
        let answer: Answer = serde_json::from_str(payload)?;
        answer_page(id, &answer, options)
    }
}
