//! Standalone error page.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{escape, Template};
use crate::error::Result;

static TEMPLATE: LazyLock<Template> = LazyLock::new(|| {
    Template::new(
        r#"<!DOCTYPE html>
<html lang="zh">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{code}} - {{message}}</title>
    <style>
        body { font-family: sans-serif; text-align: center; padding: 20px; }
        .error { margin: 20px; }
    </style>
</head>
<body>
    <div class="error">
        <h1>{{code}}</h1>
        <p>{{name}}</p>
        <p>{{message}}</p>
    </div>
</body>
</html>"#,
    )
});

/// Render the page shown when content cannot be fetched or built.
pub fn error_page(code: u16, name: &str, message: &str) -> Result<String> {
    let mut values = HashMap::new();
    values.insert("code", code.to_string());
    values.insert("name", escape(name));
    values.insert("message", escape(message));
    TEMPLATE.render(&values)
}
