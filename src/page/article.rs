//! Column article pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{escape, format_stats, render_head, ContentKind, PageBuilder, PageMeta, PageOptions, Template};
use crate::error::Result;
use crate::model::Article;
use crate::render::render_segments;

static TEMPLATE: LazyLock<Template> = LazyLock::new(|| {
    Template::new(
        r#"<!DOCTYPE html>
<html lang="zh">
{{head}}
<body style="max-width: 1000px; margin: 0 auto; padding: 0 1em 0 1em;" class="yue">
    <header>
        {{cover}}
        <h1><a href="{{url}}">{{title}}</a></h1>
        <div class="author">
            {{avatar}}
            <div>
                <h3 rel="author"><a href="{{author_url}}" target="_blank">@{{author}}</a></h3>
                <div>{{headline}}</div>
            </div>
        </div>
        <time>发表于 {{created_time}}</time>
        <p rel="stats" style="color: #999; font-size: 0.9em;">{{stats}}</p>
    </header>
    <article>
        {{content}}
        {{column}}
    </article>
</body>
</html>
"#,
    )
});

/// Canonical URL of an article.
pub fn article_url(id: &str) -> String {
    format!("https://zhuanlan.zhihu.com/p/{}", id)
}

/// Build the page for an article.
pub fn article_page(id: &str, article: &Article, options: &PageOptions) -> Result<String> {
    let url = article_url(id);
    let content = render_segments(&article.structured_content, &options.render)?;
    let cover_url = article
        .cover_image
        .as_ref()
        .map(|c| c.url.as_str())
        .filter(|u| !u.is_empty());
    let avatar = article.author.avatar.as_ref().map(|a| &a.avatar_image);
    let statistics = article
        .reaction
        .as_ref()
        .map(|r| r.statistics.clone())
        .unwrap_or_default();

    let head = render_head(
        &PageMeta {
            title: &article.header.text,
            description: &article.excerpt,
            url: &url,
            image: cover_url,
            creator: Some(&article.author.fullname),
        },
        options,
    )?;

    let mut values = HashMap::new();
    values.insert("head", head);
    values.insert(
        "cover",
        cover_url
            .map(|u| format!("<img class=\"origin_image\" src=\"{}\"/>", escape(u)))
            .unwrap_or_default(),
    );
    values.insert("url", escape(&url));
    values.insert("title", escape(&article.header.text));
    values.insert(
        "avatar",
        avatar
            .map(|a| a.day.as_str())
            .filter(|d| !d.is_empty())
            .map(|d| format!("<img class=\"avatar\" id=\"avatar\" src=\"{}\"/>", escape(d)))
            .unwrap_or_default(),
    );
    values.insert(
        "author_url",
        escape(avatar.map(|a| a.jump_url.as_str()).unwrap_or_default()),
    );
    values.insert("author", escape(&article.author.fullname));
    values.insert("headline", escape(&article.author.description));
    values.insert(
        "created_time",
        escape(
            article
                .content_end_info
                .as_ref()
                .map(|i| i.create_time_text.as_str())
                .unwrap_or_default(),
        ),
    );
    values.insert(
        "stats",
        format_stats(statistics.up_vote_count, statistics.comment_count),
    );
    values.insert("content", content);
    values.insert("column", column_box(article));
    TEMPLATE.render(&values)
}

fn column_box(article: &Article) -> String {
    let Some(column) = article
        .third_business
        .as_ref()
        .and_then(|b| b.column.as_ref())
    else {
        return String::new();
    };
    format!(
        "<hr><div class=\"column\" style=\"margin: 1em 0; padding: 0.5em 1em; border: 2px solid #999; border-radius: 5px;\"><h2>专栏：{}</h2><p>{}</p></div>",
        escape(&column.title),
        escape(&column.description)
    )
}

/// [`PageBuilder`] for articles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticlePage;

impl PageBuilder for ArticlePage {
    fn kind(&self) -> ContentKind {
        ContentKind::Article
    }

    fn build(&self, id: &str, payload: &str, options: &PageOptions) -> Result<String> {
        let article: Article = serde_json::from_str(payload)?;
        article_page(id, &article, options)
    }
}
