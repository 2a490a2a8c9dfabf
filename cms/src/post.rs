//! Blog post types built from Notion pages.

use beacon_content::NormalizedDocument;
use beacon_types::collapse_whitespace;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::wire::{Page, Property};

/// Words per minute used for reading-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

const TITLE_PROPERTY: &str = "Title";
const SLUG_PROPERTY: &str = "Slug";
const EXCERPT_PROPERTY: &str = "Excerpt";
const DATE_PROPERTY: &str = "Date";
const TAGS_PROPERTY: &str = "Tags";
const PUBLISHED_PROPERTY: &str = "Published";

/// Listing entry for one published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub cover_url: Option<String>,
}

/// A post with its rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub body: NormalizedDocument,
    pub reading_minutes: usize,
}

/// Result of looking a post up by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostLookup {
    Found(Box<Post>),
    NotFound,
}

/// Minutes to read `words` words, never less than one.
#[must_use]
pub fn reading_minutes(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

impl PostSummary {
    /// Build a summary from a database page.
    ///
    /// Pages without a slug or not marked published are skipped: they cannot
    /// be linked to.
    pub(crate) fn from_page(page: Page) -> Option<Self> {
        let published = page
            .properties
            .get(PUBLISHED_PROPERTY)
            .is_some_and(Property::checked);
        if !published {
            debug!(page_id = %page.id, "Skipping unpublished page");
            return None;
        }

        let text = |name: &str| {
            page.properties
                .get(name)
                .and_then(Property::text)
                .map(|value| collapse_whitespace(&value))
                .unwrap_or_default()
        };

        let slug = text(SLUG_PROPERTY);
        if slug.is_empty() {
            debug!(page_id = %page.id, "Skipping page without slug");
            return None;
        }

        let title = match text(TITLE_PROPERTY) {
            title if title.is_empty() => "Untitled".to_string(),
            title => title,
        };

        let date = page
            .properties
            .get(DATE_PROPERTY)
            .and_then(Property::date_start)
            .and_then(parse_date);

        let tags = page
            .properties
            .get(TAGS_PROPERTY)
            .map(Property::tags)
            .unwrap_or_default();

        Some(Self {
            excerpt: text(EXCERPT_PROPERTY),
            cover_url: page.cover.as_ref().and_then(|cover| cover.url()).map(str::to_string),
            id: page.id,
            slug,
            title,
            date,
            tags,
        })
    }
}

/// Notion dates are `YYYY-MM-DD`, optionally followed by a time.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
