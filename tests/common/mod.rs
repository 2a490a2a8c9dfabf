//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::io::Write;

use beacon_config::SiteConfig;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write `content` to a temp file and load it as the site config.
pub fn load_config(content: &str) -> SiteConfig {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    SiteConfig::load_from(file.path()).unwrap()
}

/// Site config whose `[cms]` section points at `server`.
pub fn cms_config(server: &MockServer) -> SiteConfig {
    load_config(&format!(
        r#"
[cms]
token = "secret_integration"
database_id = "db-int"
base_url = "{}"
allow_insecure = true
"#,
        server.uri()
    ))
}

/// A published Notion page row.
pub fn page(id: &str, slug: &str, title: &str, date: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Title": { "type": "title", "title": [{ "plain_text": title }] },
            "Slug": { "type": "rich_text", "rich_text": [{ "plain_text": slug }] },
            "Excerpt": { "type": "rich_text", "rich_text": [{ "plain_text": format!("About {title}") }] },
            "Date": { "type": "date", "date": { "start": date } },
            "Tags": { "type": "multi_select", "multi_select": [{ "name": "loans" }] },
            "Published": { "type": "checkbox", "checkbox": true }
        }
    })
}

/// A Notion block with a single plain rich-text span.
pub fn text_block(kind: &str, content: &str) -> Value {
    let mut block = json!({ "object": "block", "type": kind });
    block[kind] = json!({ "rich_text": [{ "plain_text": content, "annotations": {} }] });
    block
}

/// Mount a single-page database query response.
pub async fn mount_query(server: &MockServer, pages: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/databases/db-int/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": pages,
            "has_more": false,
            "next_cursor": null
        })))
        .mount(server)
        .await;
}

/// Mount a single-page children response for `block_id`.
pub async fn mount_children(server: &MockServer, block_id: &str, blocks: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/blocks/{block_id}/children")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": blocks,
            "has_more": false,
            "next_cursor": null
        })))
        .mount(server)
        .await;
}
