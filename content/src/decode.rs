//! Decoding Notion API block objects into [`ContentBlock`].
//!
//! A Notion block looks like
//!
//! ```json
//! { "object": "block", "type": "paragraph", "paragraph": { "rich_text": [ ... ] } }
//! ```
//!
//! The payload lives under a key named after the block type. Unknown types
//! decode to [`ContentBlock::Unsupported`]; a known type with a missing or
//! malformed payload is a [`BlockDecodeError`].

use beacon_types::{Annotations, ContentBlock, RichText, RichTextSpan};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockDecodeError {
    #[error("block has no type field")]
    MissingType,
    #[error("{kind} block has no payload")]
    MissingPayload { kind: String },
    #[error("{kind} block payload is malformed: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BlockDecodeError {
    /// Block type name for placeholders, `unknown` when the type itself is missing.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            BlockDecodeError::MissingType => "unknown",
            BlockDecodeError::MissingPayload { kind } | BlockDecodeError::Malformed { kind, .. } => {
                kind
            }
        }
    }
}

#[derive(Deserialize)]
struct RawRichText {
    #[serde(default)]
    plain_text: Option<String>,
    #[serde(default)]
    text: Option<RawTextContent>,
    #[serde(default)]
    annotations: Annotations,
    #[serde(default)]
    href: Option<String>,
}

#[derive(Deserialize)]
struct RawTextContent {
    #[serde(default)]
    content: String,
    #[serde(default)]
    link: Option<RawLink>,
}

#[derive(Deserialize)]
struct RawLink {
    url: String,
}

impl RawRichText {
    fn into_span(self) -> RichTextSpan {
        let (content, link) = match self.text {
            Some(text) => (text.content, text.link.map(|link| link.url)),
            None => (String::new(), None),
        };
        RichTextSpan {
            content: self.plain_text.unwrap_or(content),
            annotations: self.annotations,
            href: self.href.or(link),
        }
    }
}

fn spans(raw: Vec<RawRichText>) -> RichText {
    raw.into_iter().map(RawRichText::into_span).collect()
}

#[derive(Deserialize)]
struct TextPayload {
    rich_text: Vec<RawRichText>,
}

#[derive(Deserialize)]
struct ToDoPayload {
    rich_text: Vec<RawRichText>,
    #[serde(default)]
    checked: bool,
}

#[derive(Deserialize)]
struct CodePayload {
    rich_text: Vec<RawRichText>,
    #[serde(default)]
    language: String,
}

#[derive(Deserialize)]
struct CalloutPayload {
    rich_text: Vec<RawRichText>,
    #[serde(default)]
    icon: Option<RawIcon>,
}

#[derive(Deserialize)]
struct RawIcon {
    #[serde(default)]
    emoji: Option<String>,
}

#[derive(Deserialize)]
struct ImagePayload {
    #[serde(default)]
    external: Option<RawFile>,
    #[serde(default)]
    file: Option<RawFile>,
    #[serde(default)]
    caption: Vec<RawRichText>,
}

#[derive(Deserialize)]
struct RawFile {
    url: String,
}

#[derive(Deserialize)]
struct BookmarkPayload {
    #[serde(default)]
    url: String,
    #[serde(default)]
    caption: Vec<RawRichText>,
}

#[derive(Deserialize)]
struct ChildPagePayload {
    #[serde(default)]
    title: String,
}

/// Decode one Notion block object.
pub fn decode_block(value: &Value) -> Result<ContentBlock, BlockDecodeError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(BlockDecodeError::MissingType)?;

    let block = match kind {
        "paragraph" => ContentBlock::Paragraph {
            text: text_payload(value, kind)?,
        },
        "heading_1" => ContentBlock::Heading1 {
            text: text_payload(value, kind)?,
        },
        "heading_2" => ContentBlock::Heading2 {
            text: text_payload(value, kind)?,
        },
        "heading_3" => ContentBlock::Heading3 {
            text: text_payload(value, kind)?,
        },
        "bulleted_list_item" => ContentBlock::BulletedListItem {
            text: text_payload(value, kind)?,
        },
        "numbered_list_item" => ContentBlock::NumberedListItem {
            text: text_payload(value, kind)?,
        },
        "toggle" => ContentBlock::Toggle {
            text: text_payload(value, kind)?,
        },
        "quote" => ContentBlock::Quote {
            text: text_payload(value, kind)?,
        },
        "to_do" => {
            let payload: ToDoPayload = payload(value, kind)?;
            ContentBlock::ToDo {
                text: spans(payload.rich_text),
                checked: payload.checked,
            }
        }
        "code" => {
            let payload: CodePayload = payload(value, kind)?;
            let text = spans(payload.rich_text)
                .into_iter()
                .map(|span| span.content)
                .collect();
            ContentBlock::Code {
                text,
                language: payload.language,
            }
        }
        "callout" => {
            let payload: CalloutPayload = payload(value, kind)?;
            ContentBlock::Callout {
                text: spans(payload.rich_text),
                icon: payload.icon.and_then(|icon| icon.emoji),
            }
        }
        "image" => {
            let payload: ImagePayload = payload(value, kind)?;
            let url = payload
                .external
                .or(payload.file)
                .map(|file| file.url)
                .unwrap_or_default();
            ContentBlock::Image {
                url,
                caption: spans(payload.caption),
            }
        }
        "bookmark" => {
            let payload: BookmarkPayload = payload(value, kind)?;
            ContentBlock::Bookmark {
                url: payload.url,
                caption: spans(payload.caption),
            }
        }
        "child_page" => {
            let payload: ChildPagePayload = payload(value, kind)?;
            ContentBlock::ChildPage {
                title: payload.title,
            }
        }
        "divider" => ContentBlock::Divider,
        "table" => ContentBlock::Table,
        "column_list" => ContentBlock::ColumnList,
        "column" => ContentBlock::Column,
        other => ContentBlock::Unsupported {
            kind: other.to_string(),
        },
    };

    Ok(block)
}

fn payload<T: DeserializeOwned>(value: &Value, kind: &str) -> Result<T, BlockDecodeError> {
    let raw = value
        .get(kind)
        .ok_or_else(|| BlockDecodeError::MissingPayload {
            kind: kind.to_string(),
        })?;
    T::deserialize(raw).map_err(|source| BlockDecodeError::Malformed {
        kind: kind.to_string(),
        source,
    })
}

fn text_payload(value: &Value, kind: &str) -> Result<RichText, BlockDecodeError> {
    let payload: TextPayload = payload(value, kind)?;
    Ok(spans(payload.rich_text))
}
