//! Structural checks on normalized documents.

use beacon_content::{normalize, normalize_values};
use beacon_types::{Color, ContentBlock, RichTextSpan};
use insta::assert_snapshot;
use scraper::{Html, Selector};
use serde_json::json;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

fn top_level_tags(fragment: &Html) -> Vec<String> {
    fragment
        .root_element()
        .children()
        .filter_map(scraper::ElementRef::wrap)
        .map(|el| el.value().name().to_string())
        .collect()
}

#[test]
fn list_grouping_is_contiguous() {
    let doc = normalize(&[
        ContentBlock::bulleted("a"),
        ContentBlock::bulleted("b"),
        ContentBlock::paragraph("x"),
        ContentBlock::bulleted("c"),
    ]);
    let fragment = Html::parse_fragment(doc.as_str());

    assert_eq!(top_level_tags(&fragment), vec!["ul", "p", "ul"]);

    let lists: Vec<usize> = fragment
        .select(&selector("ul"))
        .map(|ul| ul.select(&selector("li")).count())
        .collect();
    assert_eq!(lists, vec![2, 1]);
}

#[test]
fn unsupported_block_gets_labelled_placeholder() {
    let doc = normalize(&[ContentBlock::Unsupported {
        kind: "synced_block".to_string(),
    }]);
    let fragment = Html::parse_fragment(doc.as_str());
    let placeholder = fragment
        .select(&selector("div.unsupported-block"))
        .next()
        .expect("placeholder present");
    let text: String = placeholder.text().collect();
    assert!(!text.is_empty());
    assert!(text.contains("synced_block"));
}

#[test]
fn malformed_block_does_not_abort_document() {
    let doc = normalize_values(&[
        json!({ "type": "heading_1", "heading_1": { "rich_text": [{ "plain_text": "Guide" }] } }),
        json!({ "type": "image", "image": { "caption": "not-a-list" } }),
        json!({ "type": "paragraph", "paragraph": { "rich_text": [{ "plain_text": "Body" }] } }),
    ]);
    let fragment = Html::parse_fragment(doc.as_str());

    assert_eq!(top_level_tags(&fragment), vec!["h1", "div", "p"]);
    let error = fragment
        .select(&selector("div.block-error"))
        .next()
        .expect("error placeholder present");
    assert_eq!(error.value().attr("data-block-type"), Some("image"));
}

#[test]
fn script_content_never_becomes_markup() {
    let doc = normalize(&[
        ContentBlock::paragraph("<script>alert(1)</script>"),
        ContentBlock::Paragraph {
            text: vec![RichTextSpan::plain("click").with_href("javascript:alert(1)")],
        },
    ]);
    let fragment = Html::parse_fragment(doc.as_str());
    assert_eq!(fragment.select(&selector("script")).count(), 0);
    assert_eq!(fragment.select(&selector("a")).count(), 0);
}

#[test]
fn article_snapshot() {
    let doc = normalize(&[
        ContentBlock::Heading2 {
            text: vec![RichTextSpan::plain("Why refinancing costs more")],
        },
        ContentBlock::Paragraph {
            text: vec![
                RichTextSpan::plain("Every new loan "),
                RichTextSpan::plain("restarts").italic(),
                RichTextSpan::plain(" the interest clock.").with_color(Color::Red),
            ],
        },
        ContentBlock::numbered("Check the rate"),
        ContentBlock::numbered("Check the term"),
        ContentBlock::Callout {
            text: vec![RichTextSpan::plain("Use the calculator").bold()],
            icon: Some("💡".to_string()),
        },
        ContentBlock::Divider,
    ]);

    assert_snapshot!(
        doc.as_str(),
        @r#"<h2>Why refinancing costs more</h2><p>Every new loan <em>restarts</em><span style="color:red"> the interest clock.</span></p><ol><li>Check the rate</li><li>Check the term</li></ol><div class="callout"><span class="callout-icon">💡</span><div class="callout-text"><strong>Use the calculator</strong></div></div><hr>"#
    );
}
