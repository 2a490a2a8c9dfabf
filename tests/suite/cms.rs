//! Blog client configured from a site config file against a mock Notion API.

use beacon_cms::{CmsClient, PostLookup};
use beacon_config::SiteConfig;
use scraper::{Html, Selector};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{cms_config, mount_children, mount_query, page, text_block};

fn client(config: &SiteConfig) -> CmsClient {
    let settings = config.cms_settings().expect("cms configured");
    CmsClient::new(&settings).unwrap()
}

#[test]
fn missing_token_means_not_configured() {
    let config = crate::common::load_config("[cms]\ndatabase_id = \"db\"\n");
    assert!(config.cms_settings().is_none());
    assert!(SiteConfig::default().cms_settings().is_none());
}

#[tokio::test]
async fn lists_posts_with_configured_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/db-int/query"))
        .and(header("authorization", "Bearer secret_integration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                page("p2", "rates-rising", "Rates Rising", "2024-03-01"),
                page("p1", "why-refi", "Why Refinance", "2024-01-15T09:00:00.000Z")
            ],
            "has_more": false,
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = client(&cms_config(&server)).list_posts().await;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].slug, "rates-rising");
    assert_eq!(posts[1].title, "Why Refinance");
    assert_eq!(posts[1].date.map(|d| d.to_string()).as_deref(), Some("2024-01-15"));
    assert_eq!(posts[0].tags, vec!["loans".to_string()]);
}

#[tokio::test]
async fn post_body_is_normalized_html() {
    let server = MockServer::start().await;
    mount_query(&server, vec![page("p1", "why-refi", "Why Refinance", "2024-01-15")]).await;
    mount_children(
        &server,
        "p1",
        vec![
            text_block("heading_2", "The short version"),
            text_block("bulleted_list_item", "Lower payment"),
            text_block("bulleted_list_item", "More interest"),
            json!({ "type": "embed", "embed": { "url": "https://example.com" } }),
        ],
    )
    .await;

    let lookup = client(&cms_config(&server)).get_post("why-refi").await;
    let PostLookup::Found(post) = lookup else {
        panic!("expected post");
    };
    assert_eq!(post.summary.title, "Why Refinance");
    assert_eq!(post.reading_minutes, 1);

    let html = Html::parse_fragment(post.body.as_str());
    let items = Selector::parse("ul > li").unwrap();
    assert_eq!(html.select(&items).count(), 2);
    let heading = Selector::parse("h2").unwrap();
    assert_eq!(html.select(&heading).count(), 1);
    assert!(post.body.as_str().contains("Unsupported block type: embed"));
}

#[tokio::test]
async fn upstream_failure_degrades_to_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/db-int/query"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "object": "error",
            "status": 503,
            "message": "Notion is unavailable"
        })))
        .mount(&server)
        .await;

    let client = client(&cms_config(&server));
    assert!(client.list_posts().await.is_empty());
    assert!(matches!(client.get_post("anything").await, PostLookup::NotFound));

    let err = client.try_list_posts().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let server = MockServer::start().await;
    mount_query(&server, Vec::new()).await;

    let lookup = client(&cms_config(&server)).get_post("missing").await;
    assert!(matches!(lookup, PostLookup::NotFound));
}
