//! Per-block HTML rendering.
//!
//! List items are rendered as bare `<li>` elements here; grouping them into
//! `<ul>`/`<ol>` is the normalizer's job.

use beacon_types::{ContentBlock, RichTextSpan};
use thiserror::Error;

use crate::html::{escape, language_class, safe_media_url};
use crate::rich_text::{format_rich_text, plain_text};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockRenderError {
    #[error("{kind} block has no URL")]
    MissingUrl { kind: String },
    #[error("{kind} block has an unusable URL: {url}")]
    UnsafeUrl { kind: String, url: String },
}

/// Render one block to HTML.
pub fn render_block(block: &ContentBlock) -> Result<String, BlockRenderError> {
    let html = match block {
        ContentBlock::Paragraph { text } => element("p", text),
        ContentBlock::Heading1 { text } => element("h1", text),
        ContentBlock::Heading2 { text } => element("h2", text),
        ContentBlock::Heading3 { text } => element("h3", text),
        ContentBlock::Quote { text } => element("blockquote", text),
        ContentBlock::BulletedListItem { text } | ContentBlock::NumberedListItem { text } => {
            element("li", text)
        }
        ContentBlock::Code { text, language } => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            language_class(language),
            escape(text)
        ),
        ContentBlock::Image { url, caption } => render_image(block.kind(), url, caption)?,
        ContentBlock::Divider => "<hr>".to_string(),
        ContentBlock::Callout { text, icon } => {
            let icon = icon
                .as_deref()
                .filter(|icon| !icon.trim().is_empty())
                .map(|icon| format!("<span class=\"callout-icon\">{}</span>", escape(icon)))
                .unwrap_or_default();
            format!(
                "<div class=\"callout\">{icon}<div class=\"callout-text\">{}</div></div>",
                format_rich_text(text)
            )
        }
        ContentBlock::Bookmark { url, caption } => {
            render_bookmark(block.kind(), url, caption)?
        }
        ContentBlock::ToDo { text, checked } => {
            let checked = if *checked { " checked" } else { "" };
            format!(
                "<div class=\"todo\"><input type=\"checkbox\" disabled{checked}> <span>{}</span></div>",
                format_rich_text(text)
            )
        }
        ContentBlock::Toggle { text } => format!(
            "<details><summary>{}</summary></details>",
            format_rich_text(text)
        ),
        ContentBlock::Table => "<div class=\"table\"></div>".to_string(),
        ContentBlock::ColumnList => "<div class=\"column-list\"></div>".to_string(),
        ContentBlock::Column => "<div class=\"column\"></div>".to_string(),
        ContentBlock::ChildPage { title } => {
            format!("<div class=\"child-page\">{}</div>", escape(title))
        }
        ContentBlock::Unsupported { kind } => unsupported_placeholder(kind),
    };
    Ok(html)
}

/// Placeholder for a block type the renderer does not know.
#[must_use]
pub fn unsupported_placeholder(kind: &str) -> String {
    format!(
        "<div class=\"unsupported-block\">Unsupported block type: {}</div>",
        escape(kind)
    )
}

/// Placeholder for a block that failed to decode or render.
#[must_use]
pub fn error_placeholder(kind: &str) -> String {
    let kind = escape(kind);
    format!(
        "<div class=\"block-error\" data-block-type=\"{kind}\">Unable to display {kind} block</div>"
    )
}

fn element(tag: &str, text: &[RichTextSpan]) -> String {
    format!("<{tag}>{}</{tag}>", format_rich_text(text))
}

fn render_image(
    kind: &str,
    url: &str,
    caption: &[RichTextSpan],
) -> Result<String, BlockRenderError> {
    let src = checked_url(kind, url)?;
    let alt = plain_text(caption);
    let mut html = format!(
        "<figure><img src=\"{}\" alt=\"{}\">",
        escape(src),
        escape(alt.trim())
    );
    if !alt.trim().is_empty() {
        html.push_str("<figcaption>");
        html.push_str(&format_rich_text(caption));
        html.push_str("</figcaption>");
    }
    html.push_str("</figure>");
    Ok(html)
}

fn render_bookmark(
    kind: &str,
    url: &str,
    caption: &[RichTextSpan],
) -> Result<String, BlockRenderError> {
    let href = checked_url(kind, url)?;
    let label = if plain_text(caption).trim().is_empty() {
        escape(href).into_owned()
    } else {
        format_rich_text(caption)
    };
    Ok(format!(
        "<a class=\"bookmark\" href=\"{}\">{label}</a>",
        escape(href)
    ))
}

fn checked_url<'a>(kind: &str, url: &'a str) -> Result<&'a str, BlockRenderError> {
    if url.trim().is_empty() {
        return Err(BlockRenderError::MissingUrl {
            kind: kind.to_string(),
        });
    }
    safe_media_url(url).ok_or_else(|| BlockRenderError::UnsafeUrl {
        kind: kind.to_string(),
        url: url.to_string(),
    })
}
