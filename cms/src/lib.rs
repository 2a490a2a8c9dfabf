//! Notion-backed blog client.
//!
//! Posts live as pages in one Notion database with these properties:
//!
//! | Property | Notion type | Use |
//! |----------|-------------|-----|
//! | `Title` | title | post title |
//! | `Slug` | rich text | URL slug, required |
//! | `Excerpt` | rich text | listing blurb |
//! | `Date` | date | publish date, sort key |
//! | `Tags` | multi-select | tags |
//! | `Published` | checkbox | only checked pages are visible |
//!
//! # Error Handling
//!
//! `try_*` methods return [`CmsError`]. The plain methods are what page
//! handlers call: a failed listing yields an empty list and a failed lookup
//! yields [`PostLookup::NotFound`], with the cause logged at `warn`.

mod post;
mod wire;

use std::time::Duration;

use beacon_content::render_body;
use beacon_types::{NonEmptyString, SecretToken, truncate_with_ellipsis};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub use post::{Post, PostLookup, PostSummary, WORDS_PER_MINUTE, reading_minutes};

use wire::{ChildrenResponse, QueryResponse};

/// Canonical Notion REST API base URL.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";
/// Notion API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const PAGE_SIZE: u32 = 100;
// Upper bound on cursor pages fetched per call.
const MAX_PAGES: usize = 50;
const MAX_ERROR_MESSAGE_CHARS: usize = 300;

/// Resolved CMS connection settings.
#[derive(Debug, Clone)]
pub struct CmsSettings {
    pub base_url: String,
    pub token: SecretToken,
    pub database_id: NonEmptyString,
    pub notion_version: String,
    pub timeout: Duration,
    /// Permit plain `http` base URLs. Only for local mocks.
    pub allow_insecure: bool,
}

impl CmsSettings {
    #[must_use]
    pub fn new(token: SecretToken, database_id: NonEmptyString) -> Self {
        Self {
            base_url: NOTION_API_BASE_URL.to_string(),
            token,
            database_id,
            notion_version: NOTION_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            allow_insecure: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("invalid CMS base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("{endpoint} returned an unreadable body: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl CmsError {
    /// HTTP status for upstream rejections.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CmsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

const QUERY_ENDPOINT: &str = "databases/query";
const CHILDREN_ENDPOINT: &str = "blocks/children";

/// Client for one Notion posts database.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretToken,
    database_id: NonEmptyString,
    notion_version: String,
}

impl CmsClient {
    pub fn new(settings: &CmsSettings) -> Result<Self, CmsError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|source| CmsError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(settings.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .https_only(!settings.allow_insecure)
            .build()
            .map_err(CmsError::Client)?;

        Ok(Self {
            http,
            base_url,
            token: settings.token.clone(),
            database_id: settings.database_id.clone(),
            notion_version: settings.notion_version.clone(),
        })
    }

    /// Published posts, newest first. Empty on any upstream failure.
    pub async fn list_posts(&self) -> Vec<PostSummary> {
        match self.try_list_posts().await {
            Ok(posts) => posts,
            Err(err) => {
                warn!(error = %err, "Failed to list posts");
                Vec::new()
            }
        }
    }

    /// Post by slug. `NotFound` on a miss or any upstream failure.
    pub async fn get_post(&self, slug: &str) -> PostLookup {
        match self.try_get_post(slug).await {
            Ok(Some(post)) => PostLookup::Found(Box::new(post)),
            Ok(None) => PostLookup::NotFound,
            Err(err) => {
                warn!(slug, error = %err, "Failed to load post");
                PostLookup::NotFound
            }
        }
    }

    pub async fn try_list_posts(&self) -> Result<Vec<PostSummary>, CmsError> {
        let pages = self.query_pages(None).await?;
        let posts: Vec<PostSummary> = pages
            .into_iter()
            .filter_map(PostSummary::from_page)
            .collect();
        debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    pub async fn try_get_post(&self, slug: &str) -> Result<Option<Post>, CmsError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Ok(None);
        }

        let Some(summary) = self
            .query_pages(Some(slug))
            .await?
            .into_iter()
            .filter_map(PostSummary::from_page)
            .find(|summary| summary.slug == slug)
        else {
            debug!(slug, "No post with slug");
            return Ok(None);
        };

        let blocks = self.block_children(&summary.id).await?;
        let body = render_body(&blocks);
        debug!(slug, blocks = blocks.len(), words = body.words, "Loaded post");

        Ok(Some(Post {
            summary,
            body: body.document,
            reading_minutes: reading_minutes(body.words),
        }))
    }

    async fn query_pages(&self, slug: Option<&str>) -> Result<Vec<wire::Page>, CmsError> {
        let url = format!(
            "{}/databases/{}/query",
            self.base_url,
            self.database_id.as_str()
        );
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let body = query_body(slug, cursor.as_deref());
            let response: QueryResponse = self
                .send_json(QUERY_ENDPOINT, self.http.post(&url).json(&body))
                .await?;
            pages.extend(response.results);
            match (response.has_more, response.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => return Ok(pages),
            }
        }

        warn!(endpoint = QUERY_ENDPOINT, "Stopped paginating after {MAX_PAGES} pages");
        Ok(pages)
    }

    async fn block_children(&self, block_id: &str) -> Result<Vec<Value>, CmsError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let url = self.children_url(block_id, cursor.as_deref())?;
            let response: ChildrenResponse = self
                .send_json(CHILDREN_ENDPOINT, self.http.get(url))
                .await?;
            blocks.extend(response.results);
            match (response.has_more, response.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => return Ok(blocks),
            }
        }

        warn!(endpoint = CHILDREN_ENDPOINT, "Stopped paginating after {MAX_PAGES} pages");
        Ok(blocks)
    }

    fn children_url(&self, block_id: &str, cursor: Option<&str>) -> Result<Url, CmsError> {
        let raw = format!("{}/blocks/{block_id}/children", self.base_url);
        let mut url = Url::parse(&raw).map_err(|source| CmsError::InvalidBaseUrl {
            url: raw.clone(),
            source,
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page_size", &PAGE_SIZE.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("start_cursor", cursor);
            }
        }
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, CmsError> {
        let response = request
            .bearer_auth(self.token.expose())
            .header("Notion-Version", &self.notion_version)
            .send()
            .await
            .map_err(|source| CmsError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CmsError::Status {
                endpoint,
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| CmsError::Decode { endpoint, source })
    }
}

fn query_body(slug: Option<&str>, cursor: Option<&str>) -> Value {
    let mut filters = vec![json!({ "property": "Published", "checkbox": { "equals": true } })];
    if let Some(slug) = slug {
        filters.push(json!({ "property": "Slug", "rich_text": { "equals": slug } }));
    }

    let mut body = json!({
        "filter": { "and": filters },
        "sorts": [{ "property": "Date", "direction": "descending" }],
        "page_size": PAGE_SIZE,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = Value::String(cursor.to_string());
    }
    body
}

/// Notion error bodies carry a `message`; fall back to the raw text.
fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    truncate_with_ellipsis(&message, MAX_ERROR_MESSAGE_CHARS)
}
