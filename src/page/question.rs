//! Question pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{escape, render_head, ContentKind, PageBuilder, PageMeta, PageOptions, Template};
use crate::error::Result;
use crate::model::Question;
use crate::normalize::normalize;

static TEMPLATE: LazyLock<Template> = LazyLock::new(|| {
    Template::new(
        r#"<!DOCTYPE html>
<html lang="zh">
{{head}}
<body style="max-width: 1000px; margin: 0 auto; padding: 0 1em 0 1em;" class="yue">
    <h1><a href="{{url}}">{{title}}</a></h1>
    {{detail}}
</body>
</html>
"#,
    )
});

/// Canonical URL of a question.
pub fn question_url(id: &str) -> String {
    format!("https://www.zhihu.com/question/{}", id)
}

/// Build the page for a question.
pub fn question_page(id: &str, question: &Question, options: &PageOptions) -> Result<String> {
    let url = question_url(id);
    let head = render_head(
        &PageMeta {
            title: &question.title,
            description: &question.excerpt,
            url: &url,
            image: None,
            creator: None,
        },
        options,
    )?;

    let mut values = HashMap::new();
    values.insert("head", head);
    values.insert("url", escape(&url));
    values.insert("title", escape(&question.title));
    values.insert("detail", normalize(&question.detail));
    TEMPLATE.render(&values)
}

/// [`PageBuilder`] for questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionPage;

impl PageBuilder for QuestionPage {
    fn kind(&self) -> ContentKind {
        ContentKind::Question
    }

    fn build(&self, id: &str, payload: &str, options: &PageOptions) -> Result<String> {
        let question: Question = serde_json::from_str(payload)?;
        question_page(id, &question, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_page() {
        let payload = r#"{
            "id": 42,
            "title": "Is Rust fast?",
            "detail": "<p><u>Really</u> <img data-actualsrc=\"https://pic.zhimg.com/q.jpg\"></p>",
            "excerpt": "Really"
        }"#;
        let html = QuestionPage.build("42", payload, &PageOptions::default()).unwrap();
        assert!(html.contains(r#"<meta property="og:url" content="https://www.zhihu.com/question/42">"#));
        assert!(html.contains(r#"<p>Really <img src="https://pic.zhimg.com/q.jpg"></p>"#));
        assert!(html.contains(r#"content="Really""#));
    }
}
