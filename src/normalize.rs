//! Markup normalization for upstream HTML fragments.
//!
//! Answers, questions and pins arrive as HTML produced by the upstream
//! editor. Three fixes make that HTML usable outside the site:
//!
//! - lazy-loaded images carry their real address in `data-actualsrc`
//! - outbound links go through a redirect gateway
//! - underlines left over from the editor are dropped
//!
//! Each fix touches a different tag, so they share one rewriter pass.

use url::Url;

use crate::rewriter::{Element, HtmlRewriter};

/// Host prefix of the outbound-link redirect gateway.
pub const LINK_GATEWAY_PREFIX: &str = "https://link.zhihu.com/";

/// Lazy-loading attribute holding the full-resolution image address.
pub const ACTUAL_SRC_ATTRIBUTE: &str = "data-actualsrc";

/// Which normalization passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Promote `data-actualsrc` into `src`
    pub repair_images: bool,

    /// Replace gateway links with their target
    pub unwrap_links: bool,

    /// Unwrap `<u>` elements
    pub remove_underlines: bool,
}

impl NormalizeOptions {
    /// All passes enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable image source repair.
    pub fn with_image_repair(mut self, enabled: bool) -> Self {
        self.repair_images = enabled;
        self
    }

    /// Enable or disable gateway link unwrapping.
    pub fn with_link_unwrapping(mut self, enabled: bool) -> Self {
        self.unwrap_links = enabled;
        self
    }

    /// Enable or disable underline removal.
    pub fn with_underline_removal(mut self, enabled: bool) -> Self {
        self.remove_underlines = enabled;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            repair_images: true,
            unwrap_links: true,
            remove_underlines: true,
        }
    }
}

/// Run every normalization pass over `html`.
pub fn normalize(html: &str) -> String {
    normalize_with_options(html, &NormalizeOptions::default())
}

/// Run the selected normalization passes in a single rewriter pass.
pub fn normalize_with_options(html: &str, options: &NormalizeOptions) -> String {
    let mut rewriter = HtmlRewriter::new();
    if options.repair_images {
        rewriter = rewriter.on_element("img", repair_image_source);
    }
    if options.unwrap_links {
        rewriter = rewriter.on_element("a", unwrap_gateway_link);
    }
    if options.remove_underlines {
        rewriter = rewriter.on_element("u", |el| el.remove_and_keep_content());
    }

    let out = rewriter.rewrite(html);
    let stats = rewriter.stats();
    log::debug!(
        "normalize: {} of {} matched elements changed",
        stats.elements_modified,
        stats.elements_matched
    );
    out
}

/// Only promote lazy-loaded image sources.
pub fn repair_image_sources(html: &str) -> String {
    HtmlRewriter::new()
        .on_element("img", repair_image_source)
        .rewrite(html)
}

/// Only replace gateway links with their targets.
pub fn unwrap_external_links(html: &str) -> String {
    HtmlRewriter::new()
        .on_element("a", unwrap_gateway_link)
        .rewrite(html)
}

/// Only unwrap `<u>` elements.
pub fn remove_underlines(html: &str) -> String {
    HtmlRewriter::new()
        .on_element("u", |el| el.remove_and_keep_content())
        .rewrite(html)
}

fn repair_image_source(el: &mut Element<'_>) {
    let Some(actual) = el.get_attribute(ACTUAL_SRC_ATTRIBUTE) else {
        return;
    };
    if actual.is_empty() {
        return;
    }
    let actual = actual.to_string();
    el.set_attribute("src", actual);
    el.remove_attribute(ACTUAL_SRC_ATTRIBUTE);
}

fn unwrap_gateway_link(el: &mut Element<'_>) {
    let Some(target) = el.get_attribute("href").and_then(resolve_gateway_target) else {
        return;
    };
    el.set_attribute("href", target);
}

/// Extract the real destination from a gateway link.
///
/// Returns `None` for links that do not point at the gateway, and for
/// gateway links whose `target` is absent, empty or cannot be decoded.
pub fn resolve_gateway_target(href: &str) -> Option<String> {
    if !href.starts_with(LINK_GATEWAY_PREFIX) {
        return None;
    }

    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Failed to parse gateway link {}: {}", href, e);
            return None;
        }
    };

    let raw = raw_query_value(url.query()?, "target")?;
    let target = match urlencoding::decode(&raw.replace('+', " ")) {
        Ok(target) => target.into_owned(),
        Err(e) => {
            log::warn!("Failed to decode gateway target {:?}: {}", raw, e);
            return None;
        }
    };

    // The gateway double-encodes some targets.
    if has_malformed_escape(&target) {
        log::warn!("Malformed escape in gateway target {:?}", target);
        return None;
    }
    let decoded = match urlencoding::decode(&target) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            log::warn!("Failed to decode gateway target {:?}: {}", target, e);
            return None;
        }
    };

    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

/// The still-encoded value of the first `name` pair in a query string.
fn raw_query_value<'q>(query: &'q str, name: &str) -> Option<&'q str> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then_some(value)
    })
}

/// Whether `s` has a `%` that is not followed by two hex digits.
fn has_malformed_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actual_src_wins_over_src() {
        let html = r#"<figure><img src="data:image/svg+xml;placeholder" data-actualsrc="https://pic1.zhimg.com/v2-abc_r.jpg" data-rawwidth="1080"/></figure>"#;
        let out = normalize(html);
        assert_eq!(
            out,
            r#"<figure><img src="https://pic1.zhimg.com/v2-abc_r.jpg" data-rawwidth="1080"/></figure>"#
        );
    }

    #[test]
    fn test_actual_src_added_when_src_missing() {
        let out = repair_image_sources(r#"<img data-actualsrc="a.jpg">"#);
        assert_eq!(out, r#"<img src="a.jpg">"#);
    }

    #[test]
    fn test_image_without_placeholder_untouched() {
        let html = r#"<img  src="a.jpg"   class="content_image">"#;
        assert_eq!(normalize(html), html);
    }

    #[test]
    fn test_gateway_link_unwrapped() {
        let html = r#"<a href="https://link.zhihu.com/?target=https%3A//github.com/frostming/fxzhihu" class=" external" target="_blank">repo</a>"#;
        let out = unwrap_external_links(html);
        assert_eq!(
            out,
            r#"<a href="https://github.com/frostming/fxzhihu" class=" external" target="_blank">repo</a>"#
        );
    }

    #[test]
    fn test_gateway_target_with_query() {
        let target = resolve_gateway_target(
            "https://link.zhihu.com/?target=https%3A%2F%2Fexample.com%2Fsearch%3Fq%3Drust%26page%3D2",
        );
        assert_eq!(
            target.as_deref(),
            Some("https://example.com/search?q=rust&page=2")
        );
    }

    #[test]
    fn test_gateway_link_with_entity_encoded_href() {
        let html = r#"<a href="https://link.zhihu.com/?target=https%3A//a.com/%3Fx%3D1&amp;utm=z">a</a>"#;
        let out = normalize(html);
        assert_eq!(out, r#"<a href="https://a.com/?x=1">a</a>"#);
    }

    #[test]
    fn test_non_gateway_link_untouched() {
        let html = r#"<a href="https://www.zhihu.com/people/x">x</a>"#;
        assert_eq!(normalize(html), html);
        assert_eq!(resolve_gateway_target("https://www.zhihu.com/?target=x"), None);
    }

    #[test]
    fn test_gateway_without_target_untouched() {
        let html = r#"<a href="https://link.zhihu.com/?foo=bar">x</a>"#;
        assert_eq!(normalize(html), html);

        let html = r#"<a href="https://link.zhihu.com/?target=">x</a>"#;
        assert_eq!(normalize(html), html);
    }

    #[test]
    fn test_gateway_undecodable_target_untouched() {
        // Second decoding step yields invalid UTF-8.
        let html = r#"<a href="https://link.zhihu.com/?target=%25E4%25ZZ">x</a>"#;
        assert_eq!(normalize(html), html);
    }

    #[test]
    fn test_gateway_malformed_escape_untouched() {
        for html in [
            r#"<a href="https://link.zhihu.com/?target=%25ZZ">x</a>"#,
            r#"<a href="https://link.zhihu.com/?target=https%3A//a.org/%E4%ZZ">x</a>"#,
            r#"<a href="https://link.zhihu.com/?target=https%3A//a.org/%25">x</a>"#,
        ] {
            assert_eq!(normalize(html), html, "input: {html}");
        }
        assert_eq!(
            resolve_gateway_target("https://link.zhihu.com/?target=https%3A//a.org/%2541"),
            Some("https://a.org/A".to_string())
        );
    }

    #[test]
    fn test_has_malformed_escape() {
        assert!(has_malformed_escape("%"));
        assert!(has_malformed_escape("a%4"));
        assert!(has_malformed_escape("%G1"));
        assert!(!has_malformed_escape("a%41b%e4"));
        assert!(!has_malformed_escape("plain"));
    }

    #[test]
    fn test_gateway_prefix_must_match_exactly() {
        assert_eq!(resolve_gateway_target("http://link.zhihu.com/?target=x"), None);
        assert_eq!(resolve_gateway_target("https://link.zhihu.com.evil/?target=x"), None);
        assert_eq!(
            resolve_gateway_target("https://link.zhihu.com/?target=https%3A//x.org").as_deref(),
            Some("https://x.org")
        );
    }

    #[test]
    fn test_underline_removed() {
        let html = "<p>before <u>inner</u> after</p>";
        assert_eq!(remove_underlines(html), "<p>before inner after</p>");
        assert_eq!(normalize(html), "<p>before inner after</p>");
    }

    #[test]
    fn test_passes_are_order_insensitive() {
        let html = concat!(
            r#"<p><u>see</u> <a href="https://link.zhihu.com/?target=https%3A//x.org">x</a>"#,
            r#"<img src="s" data-actualsrc="big"></p>"#
        );
        let combined = normalize(html);
        let a = remove_underlines(&unwrap_external_links(&repair_image_sources(html)));
        let b = repair_image_sources(&remove_underlines(&unwrap_external_links(html)));
        assert_eq!(combined, a);
        assert_eq!(combined, b);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let html = concat!(
            r#"<p>a <u>b</u> <a href="https://link.zhihu.com/?target=https%3A//x.org/%3Fa%3D1">x</a></p>"#,
            r#"<figure><img src="s" data-actualsrc="https://pic.zhimg.com/a.jpg"/></figure>"#
        );
        let once = normalize(html);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_options_select_passes() {
        let html = r#"<u>x</u><img data-actualsrc="a">"#;
        let options = NormalizeOptions::new().with_underline_removal(false);
        assert_eq!(
            normalize_with_options(html, &options),
            r#"<u>x</u><img src="a">"#
        );
    }
}
