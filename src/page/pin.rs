//! Pin (status) pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{
    escape, format_stats, format_timestamp, render_head, ContentKind, PageBuilder, PageMeta,
    PageOptions, Template,
};
use crate::error::Result;
use crate::model::Pin;
use crate::normalize::normalize;
use crate::reference::extract_references;

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
                <h2 rel="author"><a href="{{author_url}}" target="_blank">@{{author}}</a></h2>
                <p>{{headline}}</p>
            </div>
        </div>
        <time datetime="{{created_time}}">发表于 {{created_time_formatted}}</time>
        {{updated}}
        <p rel="stats" style="color: #999; font-size: 0.9em;">{{stats}}</p>
    </header>
    <article>
        {{content}}
        {{origin}}
        {{reference}}
    </article>
</body>
</html>
"#,
    )
});

/// Canonical URL of a pin.
pub fn pin_url(id: &str) -> String {
    format!("https://www.zhihu.com/pin/{}", id)
}

/// Page title of a pin.
pub fn pin_title(pin: &Pin) -> String {
    format!("{}的想法", pin.author.name)
}

/// Build the page for a pin.
pub fn pin_page(id: &str, pin: &Pin, options: &PageOptions) -> Result<String> {
    let url = pin_url(id);
    let title = pin_title(pin);
    let (created, created_formatted) = format_timestamp("pin", "created", pin.created)?;
    let updated = match pin.updated.filter(|u| *u != pin.created) {
        Some(seconds) => {
            let (updated, updated_formatted) = format_timestamp("pin", "updated", seconds)?;
            format!(
                "<time datetime=\"{}\">更新于 {}</time>",
                updated, updated_formatted
            )
        }
        None => String::new(),
    };
    let image = pin.image_url.as_deref().filter(|u| !u.is_empty());
    let reaction = pin.reaction.clone().unwrap_or_default();

    let head = render_head(
        &PageMeta {
            title: &title,
            description: &pin.excerpt_title,
            url: &url,
            image,
            creator: Some(&pin.author.name),
        },
        options,
    )?;

    let mut values = HashMap::new();
    values.insert("head", head);
    values.insert(
        "cover",
        image
            .map(|u| format!("<img class=\"origin_image\" src=\"{}\"/>", escape(u)))
            .unwrap_or_default(),
    );
    values.insert("url", escape(&url));
    values.insert("title", escape(&title));
    values.insert(
        "avatar",
        Some(pin.author.avatar_url.as_str())
            .filter(|a| !a.is_empty())
            .map(|a| format!("<img class=\"avatar\" id=\"avatar\" src=\"{}\"/>", escape(a)))
            .unwrap_or_default(),
    );
    values.insert("author_url", escape(&pin.author.profile_url()));
    values.insert("author", escape(&pin.author.name));
    values.insert("headline", escape(&pin.author.headline));
    values.insert("created_time", created);
    values.insert("created_time_formatted", created_formatted);
    values.insert("updated", updated);
    values.insert(
        "stats",
        format_stats(reaction.up_vote_count, reaction.comment_count),
    );
    values.insert("content", normalize(&pin.content_html));
    values.insert(
        "origin",
        pin.origin_pin.as_deref().map(origin_block).unwrap_or_default(),
    );
    values.insert("reference", extract_references(&pin.content_html));
    TEMPLATE.render(&values)
}

/// The reposted pin, quoted below the body.
fn origin_block(origin: &Pin) -> String {
    format!(
        "<blockquote class=\"origin_pin\"><p><a href=\"{}\">@{}</a>：</p>{}</blockquote>",
        escape(&pin_url(&origin.id)),
        escape(&origin.author.name),
        normalize(&origin.content_html)
    )
}

/// [`PageBuilder`] for pins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinPage;

impl PageBuilder for PinPage {
    fn kind(&self) -> ContentKind {
        ContentKind::Pin
    }

    fn build(&self, id: &str, payload: &str, options: &PageOptions) -> Result<String> {
        let pin: Pin = serde_json::from_str(payload)?;
        pin_page(id, &pin, options)
    }
}
