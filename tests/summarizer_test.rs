// Contract tests for the summarizer client against a mock HTTP service

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vinpanel::report::format_dashboard_text;
use vinpanel::{DocSnapshot, SummarizeRequest, SummarizerClient, scrape_dashboard};

mod common;
use common::{DASHBOARD_URL, dashboard_page};

#[tokio::test]
async fn test_summarize_posts_note_and_returns_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(body_partial_json(json!({"note": "slow week"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "A slow week."})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SummarizerClient::new(&[&server.uri()]).unwrap();
    let summary = client
        .summarize(&SummarizeRequest::note("slow week"))
        .await
        .unwrap();
    assert_eq!(summary, "A slow week.");
}

#[tokio::test]
async fn test_second_endpoint_used_when_first_fails() {
    let broken = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/suggest"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;

    let healthy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/suggest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "On my way!"})))
        .expect(1)
        .mount(&healthy)
        .await;

    let client = SummarizerClient::new(&[&broken.uri(), &healthy.uri()]).unwrap();
    let reply = client
        .suggest(&SummarizeRequest::note("customer asked for ETA"))
        .await
        .unwrap();
    assert_eq!(reply, "On my way!");
}

#[tokio::test]
async fn test_all_endpoints_down_degrades_to_local_rendering() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = SummarizerClient::new(&[&server.uri()]).unwrap();
    let result = client
        .summarize(&SummarizeRequest::note("anything"))
        .await;
    assert!(result.is_err());

    // The panel falls back to the locally formatted report.
    let html = dashboard_page();
    let doc = DocSnapshot::parse(DASHBOARD_URL, &html);
    let fallback = format_dashboard_text(&scrape_dashboard(&doc));
    assert!(fallback.contains("Sales Funnel"));
    assert!(fallback.contains("Customers: 42"));
}

#[tokio::test]
async fn test_unusable_body_is_an_error_not_a_panic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 7})))
        .mount(&server)
        .await;

    let client = SummarizerClient::new(&[&server.uri()]).unwrap();
    let result = client.summarize(&SummarizeRequest::note("hello")).await;
    assert!(result.is_err());
}
