//! Raw Notion block JSON through the normalizer, inspected as parsed HTML.

use beacon_content::{format_span, normalize_values};
use beacon_types::RichTextSpan;
use scraper::{Html, Selector};
use serde_json::json;

use crate::common::text_block;

fn select<'a>(doc: &'a Html, css: &str) -> Vec<scraper::ElementRef<'a>> {
    let selector = Selector::parse(css).unwrap();
    doc.select(&selector).collect()
}

#[test]
fn list_runs_split_around_a_paragraph() {
    let blocks = vec![
        text_block("bulleted_list_item", "a"),
        text_block("bulleted_list_item", "b"),
        text_block("paragraph", "x"),
        text_block("bulleted_list_item", "c"),
    ];
    let doc = normalize_values(&blocks);
    assert_eq!(
        doc.as_str(),
        "<ul><li>a</li><li>b</li></ul><p>x</p><ul><li>c</li></ul>"
    );

    let html = Html::parse_fragment(doc.as_str());
    let lists = select(&html, "ul");
    assert_eq!(lists.len(), 2);
    let items: Vec<usize> = lists
        .iter()
        .map(|ul| ul.children().filter_map(scraper::ElementRef::wrap).count())
        .collect();
    assert_eq!(items, vec![2, 1]);
}

#[test]
fn bulleted_and_numbered_runs_do_not_merge() {
    let blocks = vec![
        text_block("bulleted_list_item", "a"),
        text_block("numbered_list_item", "one"),
        text_block("numbered_list_item", "two"),
    ];
    let doc = normalize_values(&blocks);
    assert_eq!(
        doc.as_str(),
        "<ul><li>a</li></ul><ol><li>one</li><li>two</li></ol>"
    );
}

#[test]
fn link_wraps_bold_and_italic() {
    let span = RichTextSpan::plain("hi")
        .bold()
        .italic()
        .with_href("https://x");
    let html = format_span(&span);
    assert!(html.starts_with("<a "), "{html}");
    assert!(html.ends_with("</a>"), "{html}");
    assert!(html.contains("<strong>"));
    assert!(html.contains("<em>"));

    let parsed = Html::parse_fragment(&html);
    let anchor = select(&parsed, "a");
    assert_eq!(anchor.len(), 1);
    assert_eq!(anchor[0].value().attr("href"), Some("https://x"));
    assert_eq!(select(&parsed, "a strong em, a em strong").len(), 1);
}

#[test]
fn annotated_span_from_json() {
    let block = json!({
        "type": "paragraph",
        "paragraph": { "rich_text": [{
            "type": "text",
            "text": { "content": "hi", "link": { "url": "https://x" } },
            "annotations": { "bold": true, "italic": true },
            "plain_text": "hi",
            "href": "https://x"
        }] }
    });
    let doc = normalize_values(&[block]);
    let html = Html::parse_fragment(doc.as_str());
    assert_eq!(select(&html, "p > a > strong > em").len(), 1);
    assert_eq!(select(&html, "p > a").len(), 1);
}

#[test]
fn unknown_block_becomes_labelled_placeholder() {
    let block = json!({ "type": "synced_block", "synced_block": {} });
    let doc = normalize_values(&[block]);
    assert!(!doc.is_empty());
    assert!(doc.as_str().contains("Unsupported block type: synced_block"));
}

#[test]
fn one_bad_block_does_not_sink_the_document() {
    let blocks = vec![
        text_block("heading_1", "Title"),
        json!({ "type": "image", "image": { "type": "external", "external": {} } }),
        json!({ "type": "bookmark", "bookmark": { "url": "javascript:alert(1)" } }),
        text_block("paragraph", "Body"),
    ];
    let doc = normalize_values(&blocks);
    let html = Html::parse_fragment(doc.as_str());

    assert_eq!(select(&html, "h1").len(), 1);
    assert_eq!(select(&html, "p").len(), 1);
    let errors = select(&html, "div.block-error");
    let kinds: Vec<&str> = errors
        .iter()
        .filter_map(|div| div.value().attr("data-block-type"))
        .collect();
    assert_eq!(kinds, vec!["image", "bookmark"]);
    assert!(!doc.as_str().contains("javascript:"));
}

#[test]
fn markup_in_text_is_escaped() {
    let doc = normalize_values(&[text_block("paragraph", "<script>alert(1)</script>")]);
    let html = Html::parse_fragment(doc.as_str());
    assert!(select(&html, "script").is_empty());
    assert!(doc.as_str().contains("&lt;script&gt;"));
}
