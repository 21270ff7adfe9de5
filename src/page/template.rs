//! `{{slot}}` templates for page assembly.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("SLOT: hardcoded regex is valid")
});

/// A page template with named `{{slot}}` placeholders.
///
/// Values are inserted as given; callers escape them for their context.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    slots: Vec<String>,
}

impl Template {
    /// Compile a template.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut slots: Vec<String> = Vec::new();
        for cap in SLOT.captures_iter(&source) {
            let name = &cap[1];
            if !slots.iter().any(|s| s == name) {
                slots.push(name.to_string());
            }
        }
        Self { source, slots }
    }

    /// Slot names in order of first appearance.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Substitute every slot.
    ///
    /// A slot without a value is an error; extra values are ignored.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String> {
        if let Some(missing) = self.slots.iter().find(|s| !values.contains_key(s.as_str())) {
            return Err(Error::Template(format!("no value for slot `{}`", missing)));
        }

        let mut out = String::with_capacity(self.source.len() + values.values().map(String::len).sum::<usize>());
        let mut last = 0;
        for cap in SLOT.captures_iter(&self.source) {
            let Some(whole) = cap.get(0) else {
                continue;
            };
            out.push_str(&self.source[last..whole.start()]);
            if let Some(value) = values.get(&cap[1]) {
                out.push_str(value);
            }
            last = whole.end();
        }
        out.push_str(&self.source[last..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_in_order() {
        let t = Template::new("<h1>{{title}}</h1>{{ body }}<a>{{title}}</a>");
        assert_eq!(t.slots(), &["title".to_string(), "body".to_string()]);
    }

    #[test]
    fn test_render() {
        let t = Template::new("<h1>{{title}}</h1>{{ body }}<a>{{title}}</a>");
        let mut values = HashMap::new();
        values.insert("title", "T".to_string());
        values.insert("body", "<p>b</p>".to_string());
        values.insert("unused", "x".to_string());
        assert_eq!(t.render(&values).unwrap(), "<h1>T</h1><p>b</p><a>T</a>");
    }

    #[test]
    fn test_missing_value_is_error() {
        let t = Template::new("{{a}}{{b}}");
        let mut values = HashMap::new();
        values.insert("a", String::new());
        let err = t.render(&values).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().contains("`b`"));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let t = Template::new("{{a}}");
        let mut values = HashMap::new();
        values.insert("a", "{{b}}".to_string());
        assert_eq!(t.render(&values).unwrap(), "{{b}}");
    }

    #[test]
    fn test_braces_without_name_are_text() {
        let t = Template::new("fn x() {{ }} {{1a}}");
        assert!(t.slots().is_empty());
        assert_eq!(t.render(&HashMap::new()).unwrap(), "fn x() {{ }} {{1a}}");
    }
}
