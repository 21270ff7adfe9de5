//! Integration tests for markup normalization and reference extraction.

use fxzhihu::{extract_references, normalize, rewrite, HtmlRewriter};

const ANSWER_HTML: &str = concat!(
    "<!-- upstream -->\n",
    "<p data-pid=\"a1\">Rust 是一门<u>系统</u>编程语言。",
    "<sup data-text=\"The Rust Book\" data-url=\"https://doc.rust-lang.org/book/\" data-draft-node=\"inline\" data-draft-type=\"reference\" data-numero=\"2\">[2]</sup>",
    "<sup data-text=\"Rust homepage\" data-url=\"https://www.rust-lang.org\" data-draft-node=\"inline\" data-draft-type=\"reference\" data-numero=\"10\">[10]</sup>",
    "<sup data-text=\"Rustonomicon\" data-url=\"https://doc.rust-lang.org/nomicon/\" data-draft-node=\"inline\" data-draft-type=\"reference\" data-numero=\"1\">[1]</sup></p>\n",
    "<figure data-size=\"normal\"><noscript><img src=\"https://pic1.zhimg.com/v2-a_b.jpg\" data-rawwidth=\"1280\"/></noscript>",
    "<img src=\"data:image/svg+xml;utf8,&lt;svg/&gt;\" data-rawwidth=\"1280\" class=\"lazy\" data-actualsrc=\"https://pic1.zhimg.com/v2-a_b.jpg\"/></figure>\n",
    "<p>见 <a href=\"https://link.zhihu.com/?target=https%3A//github.com/rust-lang/rust\" class=\" wrap external\" target=\"_blank\" rel=\"nofollow noreferrer\">GitHub</a></p>\n",
    "<script>if (a < b && c > d) { document.write('<u>x</u>') }</script>\n",
);

#[test]
fn test_answer_body_normalized() {
    let out = normalize(ANSWER_HTML);

    assert!(out.starts_with("<!-- upstream -->\n"));
    assert!(out.contains("Rust 是一门系统编程语言。"));
    assert!(out.contains(
        r#"<img src="https://pic1.zhimg.com/v2-a_b.jpg" data-rawwidth="1280" class="lazy"/>"#
    ));
    assert!(!out.contains("data-actualsrc"));
    assert!(out.contains(
        r#"<a href="https://github.com/rust-lang/rust" class=" wrap external" target="_blank" rel="nofollow noreferrer">GitHub</a>"#
    ));
    assert!(out.contains("document.write('<u>x</u>')"));
    assert!(out.contains(r#"<sup data-text="The Rust Book""#));
}

#[test]
fn test_normalize_idempotent_on_real_markup() {
    let once = normalize(ANSWER_HTML);
    assert_eq!(normalize(&once), once);
}

#[test]
fn test_untouched_markup_is_byte_identical() {
    let html = "<!DOCTYPE html>\n<div  class='x'  >\n  <p>a &amp; b</p>\n  <br>\n</div>";
    assert_eq!(normalize(html), html);
}

#[test]
fn test_malformed_markup_passes_through() {
    for html in [
        "<p>unclosed <u>underline",
        "<a href=\"https://link.zhihu.com/?target=x",
        "</u></p> stray closers",
        "a < b <",
        "<!-- never closed",
    ] {
        let _ = normalize(html);
    }
    assert_eq!(normalize("<p>unclosed <u>underline"), "<p>unclosed underline");
}

#[test]
fn test_bibliography_numeric_order() {
    let block = extract_references(ANSWER_HTML);
    assert!(block.starts_with("<hr><section><h2>参考</h2>1. Rustonomicon"));
    let two = block.find("2. The Rust Book").unwrap();
    let ten = block.find("10. Rust homepage").unwrap();
    assert!(two < ten);
    assert!(block.ends_with(
        "10. Rust homepage <a href=\"https://www.rust-lang.org\">https://www.rust-lang.org</a></section>"
    ));
}

#[test]
fn test_no_references_is_empty_string() {
    assert_eq!(extract_references("<p>nothing here</p>"), "");
}

#[test]
fn test_custom_rewriter_handlers() {
    let mut seen = Vec::new();
    let out = rewrite(
        "<p>a<b>b</b></p><P>c</P>",
        HtmlRewriter::new()
            .on_element("p", |el| {
                el.set_attribute("class", "para");
            })
            .on_text("b", |chunk| {
                seen.push(chunk.text().to_string());
                chunk.replace("B");
            }),
    );
    assert_eq!(out, r#"<p class="para">a<b>B</b></p><P class="para">c</P>"#);
    assert_eq!(seen, vec!["b".to_string()]);
}

#[test]
fn test_duplicate_footnote_last_write_wins() {
    let html = concat!(
        r#"<sup data-text="old" data-url="https://a.org" data-numero="1">[1]</sup>"#,
        r#"<sup data-text="new" data-url="https://b.org" data-numero="1">[1]</sup>"#,
        r#"<sup data-text="partial" data-url="" data-numero="2">[2]</sup>"#,
    );
    assert_eq!(
        extract_references(html),
        "<hr><section><h2>参考</h2>1. new <a href=\"https://b.org\">https://b.org</a></section>"
    );
}
