//! Inline rich-text formatting.
//!
//! Wrappers nest in a fixed order, innermost first:
//!
//! ```text
//! <a href> <span style> <strong> <em> <u> <s> <code> text </code> </s> </u> </em> </strong> </span> </a>
//! ```
//!
//! so a link always wraps everything else and inline code sits directly
//! around the escaped text.

use beacon_types::{ContentBlock, RichTextSpan};

use crate::html::{escape, escape_multiline, safe_href};

/// Render a sequence of spans to inline HTML.
#[must_use]
pub fn format_rich_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(format_span).collect()
}

/// Render one span with all of its wrappers.
#[must_use]
pub fn format_span(span: &RichTextSpan) -> String {
    if span.content.is_empty() {
        return String::new();
    }

    let annotations = &span.annotations;
    let mut html = escape_multiline(&span.content);

    if annotations.code {
        html = wrap("code", &html);
    }
    if annotations.strikethrough {
        html = wrap("s", &html);
    }
    if annotations.underline {
        html = wrap("u", &html);
    }
    if annotations.italic {
        html = wrap("em", &html);
    }
    if annotations.bold {
        html = wrap("strong", &html);
    }
    if !annotations.color.is_default() {
        let property = if annotations.color.is_background() {
            "background-color"
        } else {
            "color"
        };
        html = format!(
            "<span style=\"{property}:{}\">{html}</span>",
            annotations.color.css_name()
        );
    }
    if let Some(href) = span.href.as_deref().and_then(safe_href) {
        html = format!("<a href=\"{}\">{html}</a>", escape(href));
    }

    html
}

/// Concatenated text of the spans, without markup.
#[must_use]
pub fn plain_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|span| span.content.as_str()).collect()
}

/// Readable text carried by a block, for word counts and excerpts.
#[must_use]
pub fn block_text(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Code { text, .. } => text.clone(),
        ContentBlock::ChildPage { title } => title.clone(),
        other => other.rich_text().map(plain_text).unwrap_or_default(),
    }
}

fn wrap(tag: &str, inner: &str) -> String {
    format!("<{tag}>{inner}</{tag}>")
}
