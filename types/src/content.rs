//! Content block model for CMS documents.
//!
//! Mirrors the subset of the Notion block model the site renders. Decoding from
//! the Notion wire format lives in `beacon-content`; these are the decoded forms.

use serde::{Deserialize, Serialize};

/// Sequence of formatted text spans.
pub type RichText = Vec<RichTextSpan>;

/// Notion text color. Unknown names collapse to [`Color::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}

impl Color {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gray" => Color::Gray,
            "brown" => Color::Brown,
            "orange" => Color::Orange,
            "yellow" => Color::Yellow,
            "green" => Color::Green,
            "blue" => Color::Blue,
            "purple" => Color::Purple,
            "pink" => Color::Pink,
            "red" => Color::Red,
            "gray_background" => Color::GrayBackground,
            "brown_background" => Color::BrownBackground,
            "orange_background" => Color::OrangeBackground,
            "yellow_background" => Color::YellowBackground,
            "green_background" => Color::GreenBackground,
            "blue_background" => Color::BlueBackground,
            "purple_background" => Color::PurpleBackground,
            "pink_background" => Color::PinkBackground,
            "red_background" => Color::RedBackground,
            _ => Color::Default,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Gray => "gray",
            Color::Brown => "brown",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Red => "red",
            Color::GrayBackground => "gray_background",
            Color::BrownBackground => "brown_background",
            Color::OrangeBackground => "orange_background",
            Color::YellowBackground => "yellow_background",
            Color::GreenBackground => "green_background",
            Color::BlueBackground => "blue_background",
            Color::PurpleBackground => "purple_background",
            Color::PinkBackground => "pink_background",
            Color::RedBackground => "red_background",
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Color::Default
    }

    #[must_use]
    pub fn is_background(&self) -> bool {
        self.as_str().ends_with("_background")
    }

    /// CSS color name without the `_background` suffix.
    #[must_use]
    pub fn css_name(&self) -> &'static str {
        let name = self.as_str();
        name.strip_suffix("_background").unwrap_or(name)
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.as_str().to_string()
    }
}

/// Inline formatting flags for a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// A run of text sharing one set of annotations and an optional link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub content: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RichTextSpan {
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            annotations: Annotations::default(),
            href: None,
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    #[must_use]
    pub fn underline(mut self) -> Self {
        self.annotations.underline = true;
        self
    }

    #[must_use]
    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    #[must_use]
    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.annotations.color = color;
        self
    }

    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// A single document block.
///
/// Text-bearing variants carry [`RichText`]. Structural variants (`Table`,
/// `ColumnList`, `Column`) carry nothing: their children are fetched and
/// rendered separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph { text: RichText },
    #[serde(rename = "heading_1")]
    Heading1 { text: RichText },
    #[serde(rename = "heading_2")]
    Heading2 { text: RichText },
    #[serde(rename = "heading_3")]
    Heading3 { text: RichText },
    BulletedListItem { text: RichText },
    NumberedListItem { text: RichText },
    ToDo { text: RichText, checked: bool },
    Toggle { text: RichText },
    Quote { text: RichText },
    Code { text: String, language: String },
    Callout { text: RichText, icon: Option<String> },
    Image { url: String, caption: RichText },
    Divider,
    Bookmark { url: String, caption: RichText },
    Table,
    ColumnList,
    Column,
    ChildPage { title: String },
    Unsupported { kind: String },
}

impl ContentBlock {
    /// Notion type name for this block.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Heading1 { .. } => "heading_1",
            ContentBlock::Heading2 { .. } => "heading_2",
            ContentBlock::Heading3 { .. } => "heading_3",
            ContentBlock::BulletedListItem { .. } => "bulleted_list_item",
            ContentBlock::NumberedListItem { .. } => "numbered_list_item",
            ContentBlock::ToDo { .. } => "to_do",
            ContentBlock::Toggle { .. } => "toggle",
            ContentBlock::Quote { .. } => "quote",
            ContentBlock::Code { .. } => "code",
            ContentBlock::Callout { .. } => "callout",
            ContentBlock::Image { .. } => "image",
            ContentBlock::Divider => "divider",
            ContentBlock::Bookmark { .. } => "bookmark",
            ContentBlock::Table => "table",
            ContentBlock::ColumnList => "column_list",
            ContentBlock::Column => "column",
            ContentBlock::ChildPage { .. } => "child_page",
            ContentBlock::Unsupported { kind } => kind,
        }
    }

    /// The block's rich-text payload, if it has one.
    #[must_use]
    pub fn rich_text(&self) -> Option<&[RichTextSpan]> {
        match self {
            ContentBlock::Paragraph { text }
            | ContentBlock::Heading1 { text }
            | ContentBlock::Heading2 { text }
            | ContentBlock::Heading3 { text }
            | ContentBlock::BulletedListItem { text }
            | ContentBlock::NumberedListItem { text }
            | ContentBlock::ToDo { text, .. }
            | ContentBlock::Toggle { text }
            | ContentBlock::Quote { text }
            | ContentBlock::Callout { text, .. } => Some(text),
            ContentBlock::Image { caption, .. } | ContentBlock::Bookmark { caption, .. } => {
                Some(caption)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn paragraph(content: impl Into<String>) -> Self {
        ContentBlock::Paragraph {
            text: vec![RichTextSpan::plain(content)],
        }
    }

    #[must_use]
    pub fn bulleted(content: impl Into<String>) -> Self {
        ContentBlock::BulletedListItem {
            text: vec![RichTextSpan::plain(content)],
        }
    }

    #[must_use]
    pub fn numbered(content: impl Into<String>) -> Self {
        ContentBlock::NumberedListItem {
            text: vec![RichTextSpan::plain(content)],
        }
    }
}
