//! Markdown to sanitized HTML.
//!
//! Blog content is authored in Markdown, rendered with `pulldown-cmark` and
//! then filtered through a fixed `ammonia` allow-list. Only the filtered HTML
//! is ever persisted or rendered.

use std::sync::LazyLock;

use ammonia::Builder;
use pulldown_cmark::{Options, Parser, html};
use serde_json::Value;

/// Tags that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "p", "a", "ul", "ol", "li", "b", "i",
    "strong", "em", "strike", "code", "hr", "br", "div", "table", "thead", "tbody", "tfoot", "tr",
    "th", "td", "pre", "span", "img", "del", "ins", "sup", "sub",
];

/// Attributes allowed on any surviving tag.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "href", "src", "alt", "title", "class", "width", "height", "target", "rel",
];

/// Tags removed together with everything inside them.
pub const FORBIDDEN_TAGS: &[&str] = &["script", "style", "iframe", "object", "embed", "form"];

/// Attributes that must never appear in output.
pub const FORBIDDEN_ATTRIBUTES: &[&str] = &["onerror", "onload", "onclick", "style"];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

const WORDS_PER_MINUTE: usize = 200;

static HTML_POLICY: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::empty();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .generic_attributes(
            ALLOWED_ATTRIBUTES
                .iter()
                .copied()
                .filter(|attr| !FORBIDDEN_ATTRIBUTES.contains(attr))
                .collect(),
        )
        .clean_content_tags(FORBIDDEN_TAGS.iter().copied().collect())
        .url_schemes(URL_SCHEMES.iter().copied().collect())
        // `rel` is author-controlled, so ammonia must not inject its own.
        .link_rel(None)
        .strip_comments(true);
    builder
});

static TEXT_POLICY: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::empty();
    builder.clean_content_tags(["script", "style"].into_iter().collect());
    builder
});

/// Render untrusted Markdown to allow-listed HTML.
pub fn sanitize_markdown(markdown: &str) -> String {
    let cleaned = markdown.replace('\0', "");
    let cleaned = cleaned.trim();

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut raw_html = String::with_capacity(cleaned.len() * 3 / 2);
    html::push_html(&mut raw_html, Parser::new_ext(cleaned, options));

    sanitize_html(&raw_html)
}

/// Same as [`sanitize_markdown`], but anything other than a JSON string yields `""`.
pub fn sanitize_markdown_value(value: &Value) -> String {
    match value {
        Value::String(markdown) => sanitize_markdown(markdown),
        _ => String::new(),
    }
}

/// Filter HTML through the allow-list. Idempotent.
pub fn sanitize_html(input: &str) -> String {
    HTML_POLICY.clean(input).to_string()
}

/// Strip every tag, keeping escaped text only.
pub fn sanitize_plain_text(text: &str) -> String {
    TEXT_POLICY.clean(text).to_string()
}

/// Estimated minutes to read sanitized HTML content.
pub fn reading_time_minutes(content: &str) -> usize {
    let words = sanitize_plain_text(content).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_survives() {
        assert_eq!(sanitize_markdown("**bold**"), "<p><strong>bold</strong></p>\n");
    }

    #[test]
    fn test_markdown_structures_render() {
        let html = sanitize_markdown("# Title\n\n- one\n- two\n\n~~gone~~ `code`");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn test_tables_render() {
        let html = sanitize_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>a</th>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn test_script_removed_with_content() {
        let html = sanitize_markdown("Hello\n\n<script>alert('xss')</script>\n\nWorld");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert"));
        assert!(html.contains("Hello"));
        assert!(html.contains("World"));
    }

    #[test]
    fn test_event_handlers_removed() {
        let html = sanitize_markdown(r#"<img src="https://cdn/a.png" onerror="alert(1)" onload="x()">"#);
        assert!(html.contains("<img"));
        assert!(html.contains(r#"src="https://cdn/a.png""#));
        assert!(!html.contains("onerror"));
        assert!(!html.contains("onload"));

        let html = sanitize_markdown(r#"<div onclick="steal()">click</div>"#);
        assert!(!html.contains("onclick"));
        assert!(html.contains("click"));
    }

    #[test]
    fn test_inline_style_removed() {
        let html = sanitize_markdown(r#"<p style="color:red" class="lead">styled</p>"#);
        assert!(!html.contains("style="));
        assert!(html.contains(r#"class="lead""#));
        assert!(html.contains("styled"));
    }

    #[test]
    fn test_forbidden_containers_removed() {
        let input = concat!(
            "<iframe src=\"https://evil\"></iframe>\n\n",
            "<object data=\"x\"></object>\n\n",
            "<embed src=\"x\">\n\n",
            "<form action=\"/steal\"><input name=\"pw\"></form>\n\n",
            "<style>body { display: none }</style>\n\n",
            "safe text",
        );
        let html = sanitize_markdown(input);
        for tag in FORBIDDEN_TAGS {
            assert!(!html.contains(&format!("<{tag}")), "{tag} survived: {html}");
        }
        assert!(!html.contains("<input"));
        assert!(!html.contains("display: none"));
        assert!(html.contains("safe text"));
    }

    #[test]
    fn test_javascript_urls_removed() {
        let html = sanitize_markdown("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));
    }

    #[test]
    fn test_link_attributes_kept() {
        let html = sanitize_html(
            r#"<a href="https://example.com" target="_blank" rel="noopener" title="t">x</a>"#,
        );
        for attr in [
            r#"href="https://example.com""#,
            r#"target="_blank""#,
            r#"rel="noopener""#,
            r#"title="t""#,
        ] {
            assert!(html.contains(attr), "{attr} missing from {html}");
        }
    }

    #[test]
    fn test_null_bytes_and_whitespace_stripped() {
        assert_eq!(sanitize_markdown("  \0hel\0lo  \n"), "<p>hello</p>\n");
        assert_eq!(sanitize_markdown("   "), "");
    }

    #[test]
    fn test_non_string_value_yields_empty() {
        assert_eq!(sanitize_markdown_value(&serde_json::json!(42)), "");
        assert_eq!(sanitize_markdown_value(&Value::Null), "");
        assert_eq!(
            sanitize_markdown_value(&serde_json::json!("*hi*")),
            "<p><em>hi</em></p>\n"
        );
    }

    #[test]
    fn test_sanitize_html_is_idempotent() {
        let inputs = [
            "<p>plain &amp; simple</p>",
            r#"<img src="x" onerror="alert(1)"><script>bad()</script><b>ok</b>"#,
            r#"<a href="javascript:void(0)" style="x">link</a>"#,
            "<table><tr><td>cell</td></tr></table>",
            "<div><span class=\"a\">nested <em>tags</em></span></div>",
            "unclosed <strong>bold",
        ];
        for input in inputs {
            let once = sanitize_html(input);
            assert_eq!(sanitize_html(&once), once, "not idempotent for {input:?}");
        }

        let rendered = sanitize_markdown("## Heading\n\n> quote with <img src=y onerror=z>");
        assert_eq!(sanitize_html(&rendered), rendered);
    }

    #[test]
    fn test_plain_text_strips_tags() {
        assert_eq!(sanitize_plain_text("Hello <b>world</b>"), "Hello world");
        assert_eq!(sanitize_plain_text("hi<script>alert(1)</script>"), "hi");
        assert_eq!(sanitize_plain_text("5 < 6"), "5 &lt; 6");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 0);
        assert_eq!(reading_time_minutes("<p>a few words</p>"), 1);
        let long = format!("<p>{}</p>", "word ".repeat(401));
        assert_eq!(reading_time_minutes(&long), 3);
    }
}
