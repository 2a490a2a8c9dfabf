//! Notion REST response shapes.
//!
//! Only the fields the blog reads are modelled; everything else is ignored.
//! Page properties are looked up by name because the database schema is
//! owned by editors, not by this crate.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChildrenResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Page {
    pub id: String,
    #[serde(default)]
    pub cover: Option<FileRef>,
    #[serde(default)]
    pub properties: HashMap<String, Property>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileRef {
    #[serde(default)]
    external: Option<Link>,
    #[serde(default)]
    file: Option<Link>,
}

impl FileRef {
    pub fn url(&self) -> Option<&str> {
        self.external
            .as_ref()
            .or(self.file.as_ref())
            .map(|link| link.url.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Link {
    url: String,
}

/// One property value. The `type` tag picks which of the fields is set.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Property {
    title: Option<Vec<PlainSpan>>,
    rich_text: Option<Vec<PlainSpan>>,
    multi_select: Option<Vec<SelectOption>>,
    date: Option<DateValue>,
    checkbox: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PlainSpan {
    #[serde(default)]
    plain_text: String,
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DateValue {
    #[serde(default)]
    start: Option<String>,
}

impl Property {
    /// Text of a `title` or `rich_text` property.
    pub fn text(&self) -> Option<String> {
        let spans = self.title.as_ref().or(self.rich_text.as_ref())?;
        Some(spans.iter().map(|span| span.plain_text.as_str()).collect())
    }

    pub fn tags(&self) -> Vec<String> {
        self.multi_select
            .iter()
            .flatten()
            .map(|option| option.name.clone())
            .collect()
    }

    pub fn date_start(&self) -> Option<&str> {
        self.date.as_ref()?.start.as_deref()
    }

    pub fn checked(&self) -> bool {
        self.checkbox.unwrap_or(false)
    }
}
