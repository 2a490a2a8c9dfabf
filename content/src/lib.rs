//! Content block normalizer.
//!
//! Turns an ordered sequence of [`ContentBlock`]s into one HTML string in a
//! single forward pass. Consecutive list items of the same kind are grouped
//! into one `<ul>` or `<ol>`; any other block closes the open list first.
//!
//! A block that fails to decode or render becomes a `block-error`
//! placeholder and the pass continues.

mod decode;
mod html;
mod render;
mod rich_text;

use std::fmt;

use beacon_types::ContentBlock;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

pub use decode::{BlockDecodeError, decode_block};
pub use html::{escape, safe_href};
pub use render::{BlockRenderError, error_placeholder, render_block, unsupported_placeholder};
pub use rich_text::{block_text, format_rich_text, format_span, plain_text};

/// HTML produced by the normalizer.
///
/// Only this crate can construct one, so every value has had its text and
/// attributes escaped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedDocument(String);

impl NormalizedDocument {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize decoded blocks.
#[must_use]
pub fn normalize(blocks: &[ContentBlock]) -> NormalizedDocument {
    let mut normalizer = Normalizer::default();
    for block in blocks {
        normalizer.push(block);
    }
    normalizer.finish().document
}

/// Decode raw Notion block objects and normalize them.
#[must_use]
pub fn normalize_values(values: &[Value]) -> NormalizedDocument {
    render_body(values).document
}

/// A normalized post body with the word count of its readable text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedBody {
    pub document: NormalizedDocument,
    /// Words across every block that decoded, whether or not it rendered.
    pub words: usize,
}

/// Like [`normalize_values`], counting words in the same pass.
#[must_use]
pub fn render_body(values: &[Value]) -> RenderedBody {
    let mut normalizer = Normalizer::default();
    for (index, value) in values.iter().enumerate() {
        match decode_block(value) {
            Ok(block) => normalizer.push(&block),
            Err(err) => {
                warn!(index, kind = err.kind(), error = %err, "Skipping undecodable block");
                normalizer.push_html(&error_placeholder(err.kind()));
            }
        }
    }
    normalizer.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

#[derive(Default)]
struct Normalizer {
    out: String,
    pending: String,
    list: Option<ListKind>,
    words: usize,
}

impl Normalizer {
    fn push(&mut self, block: &ContentBlock) {
        let list = match block {
            ContentBlock::BulletedListItem { .. } => Some(ListKind::Unordered),
            ContentBlock::NumberedListItem { .. } => Some(ListKind::Ordered),
            _ => None,
        };
        self.words += block_text(block).split_whitespace().count();

        let html = match render_block(block) {
            Ok(html) => html,
            Err(err) => {
                warn!(kind = block.kind(), error = %err, "Block failed to render");
                self.push_html(&error_placeholder(block.kind()));
                return;
            }
        };

        match list {
            Some(kind) => {
                if self.list != Some(kind) {
                    self.flush();
                    self.list = Some(kind);
                }
                self.pending.push_str(&html);
            }
            None => self.push_html(&html),
        }
    }

    fn push_html(&mut self, html: &str) {
        self.flush();
        self.out.push_str(html);
    }

    fn flush(&mut self) {
        if let Some(kind) = self.list.take()
            && !self.pending.is_empty()
        {
            let tag = kind.tag();
            self.out.push('<');
            self.out.push_str(tag);
            self.out.push('>');
            self.out.push_str(&self.pending);
            self.out.push_str("</");
            self.out.push_str(tag);
            self.out.push('>');
        }
        self.pending.clear();
    }

    fn finish(mut self) -> RenderedBody {
        self.flush();
        RenderedBody {
            document: NormalizedDocument(self.out),
            words: self.words,
        }
    }
}
