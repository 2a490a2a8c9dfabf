//! Form submissions relayed to webhooks configured in the site config.

use beacon_leads::{Delivery, LeadRelay, LeadSource, LeadSubmission, SUCCESS_MESSAGE, ValidationError};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::common::load_config;

fn relay_for(server: &MockServer) -> LeadRelay {
    let config = load_config(&format!(
        r#"
[webhooks]
contact = "{uri}/hooks/contact"
calculator = "{uri}/hooks/calculator"
newsletter = "ftp://example.com/drop"
max_retries = 0
timeout_secs = 5
"#,
        uri = server.uri()
    ));
    LeadRelay::new(&config.webhook_settings())
}

#[tokio::test]
async fn webhook_failure_still_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/contact"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let submission = LeadSubmission::new(LeadSource::Contact, "pat@example.com").with_name("Pat");
    let outcome = relay_for(&server).submit(submission).await.unwrap();

    assert_eq!(outcome.user_message, SUCCESS_MESSAGE);
    assert!(matches!(outcome.delivery, Delivery::Failed { .. }));
}

#[tokio::test]
async fn calculator_lead_carries_its_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/calculator"))
        .respond_with(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let ok = body["source"] == "calculator"
                && body["email"] == "sam@example.com"
                && body["principal"] == "80000"
                && body["timestamp"].as_str().is_some_and(|t| t.ends_with('Z'));
            ResponseTemplate::new(if ok { 200 } else { 422 })
        })
        .expect(1)
        .mount(&server)
        .await;

    let submission = LeadSubmission::new(LeadSource::Calculator, " sam@example.com ")
        .with_field("principal", "80000");
    let outcome = relay_for(&server).submit(submission).await.unwrap();
    assert!(matches!(outcome.delivery, Delivery::Delivered { status: 200 }));
}

#[tokio::test]
async fn non_http_webhook_is_ignored() {
    let server = MockServer::start().await;
    let submission = LeadSubmission::new(LeadSource::Newsletter, "pat@example.com");
    let outcome = relay_for(&server).submit(submission).await.unwrap();

    assert_eq!(outcome.user_message, SUCCESS_MESSAGE);
    assert!(matches!(outcome.delivery, Delivery::NotConfigured));
}

#[tokio::test]
async fn invalid_submission_never_reaches_the_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let submission = LeadSubmission::new(LeadSource::Contact, "not-an-email");
    let errors = relay_for(&server).submit(submission).await.unwrap_err();
    assert!(errors.contains(&ValidationError::InvalidEmail));
    assert!(errors.contains(&ValidationError::Required { field: "name" }));
}
