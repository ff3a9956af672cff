use chrono::NaiveDate;
use httpmock::prelude::*;
use listing_alert::adapters::{FixedClock, HttpFetcher, TwilioNotifier, TwilioOptions};
use listing_alert::core::DiagnosticKind;
use listing_alert::utils::error::{NotifyError, PipelineError, TransportError};
use listing_alert::{AlertEngine, AlertPipeline, NotificationStatus, PipelineSettings};
use std::time::Duration;

const RECIPIENT: &str = "+15105550123";

fn listing_page(items: &[(&str, &str)]) -> String {
    let blocks: String = items
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<div class="bsitem">
                     <a href="{href}"><img src="/thumb.jpg"></a>
                     <div><a href="{href}">{title}</a></div>
                   </div>"#
            )
        })
        .collect();
    format!("<html><body><div id=\"results\">{}</div></body></html>", blocks)
}

fn details_page(posted: &str) -> String {
    format!(
        r#"<html><body>
             <div class="buysell-details-column">Seller: trailrat</div>
             <div class="buysell-details-column">Original Post Date: {posted}<br>Price: $2,100</div>
           </body></html>"#
    )
}

fn twilio(server: &MockServer) -> TwilioNotifier {
    TwilioNotifier::new(
        TwilioOptions {
            account_sid: "AC0123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15105550100".to_string(),
        },
        Duration::from_secs(2),
    )
    .unwrap()
    .with_base_url(server.base_url())
}

fn engine(server: &MockServer) -> AlertEngine {
    let mut settings = PipelineSettings::new(server.url("/buysell/list/"));
    settings.request_timeout = Duration::from_secs(2);
    settings.banner = "BIKE ALERT:".to_string();

    AlertEngine::new(
        AlertPipeline::new(settings).unwrap(),
        Box::new(FixedClock::on(NaiveDate::from_ymd_opt(2021, 2, 5).unwrap())),
        Box::new(HttpFetcher::new(Duration::from_secs(2)).unwrap()),
        Box::new(twilio(server)),
        RECIPIENT,
    )
}

#[tokio::test]
async fn test_end_to_end_sends_fresh_listings_by_sms() {
    let server = MockServer::start_async().await;

    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/list/");
            then.status(200)
                .header("Content-Type", "text/html")
                .body(listing_page(&[
                    ("2019 Ibis Ripmo", "/buysell/101/"),
                    ("2017 Kona Process", "/buysell/102/"),
                ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/101/");
            then.status(200).body(details_page("Feb-05-2021 09:12:44"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/102/");
            then.status(200).body(details_page("Jan-28-2021 17:03:10"));
        })
        .await;
    let sms_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/2010-04-01/Accounts/AC0123/Messages.json")
                .header_exists("authorization")
                .x_www_form_urlencoded_tuple("To", RECIPIENT)
                .x_www_form_urlencoded_tuple("From", "+15105550100");
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"sid": "SM42", "status": "queued"}));
        })
        .await;

    let summary = engine(&server).run().await.unwrap();

    list_mock.assert_async().await;
    sms_mock.assert_async().await;
    assert_eq!(summary.scraped, 2);
    assert_eq!(summary.fresh.len(), 1);
    assert_eq!(summary.fresh[0].title, "2019 Ibis Ripmo");
    assert_eq!(summary.fresh[0].link, server.url("/buysell/101/"));
    assert_eq!(summary.notification, NotificationStatus::Sent);
    assert!(summary.diagnostics.is_empty());
}

#[tokio::test]
async fn test_no_new_listings_sends_nothing() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/list/");
            then.status(200)
                .body(listing_page(&[("2017 Kona Process", "/buysell/102/")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/102/");
            then.status(200).body(details_page("Jan-28-2021 17:03:10"));
        })
        .await;
    let sms_mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(201);
        })
        .await;

    let summary = engine(&server).run().await.unwrap();

    assert_eq!(summary.headline(), "no new items");
    assert_eq!(summary.notification, NotificationStatus::Skipped);
    assert_eq!(sms_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_listing_page_error_aborts_run() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/list/");
            then.status(500);
        })
        .await;
    let sms_mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(201);
        })
        .await;

    let err = engine(&server).run().await.unwrap_err();

    assert!(matches!(
        err,
        listing_alert::AlertError::Pipeline(PipelineError::PrimaryFetch(
            TransportError::Status { status: 500, .. }
        ))
    ));
    assert_eq!(sms_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_broken_listing_pages_become_diagnostics() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/list/");
            then.status(200).body(listing_page(&[
                ("Removed ad", "/buysell/201/"),
                ("Fresh ad", "/buysell/202/"),
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/201/");
            then.status(404).body("gone");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/202/");
            then.status(200).body(details_page("Feb-05-2021 07:00:00"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/2010-04-01/Accounts/AC0123/Messages.json");
            then.status(201).json_body(serde_json::json!({"sid": "SM43"}));
        })
        .await;

    let summary = engine(&server).run().await.unwrap();

    assert_eq!(summary.scraped, 2);
    assert_eq!(summary.fresh.len(), 1);
    assert_eq!(summary.fresh[0].title, "Fresh ad");
    assert_eq!(summary.diagnostics.len(), 1);
    assert_eq!(summary.diagnostics[0].index, 0);
    assert!(matches!(
        summary.diagnostics[0].kind,
        DiagnosticKind::SecondaryFetch(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_slow_listing_page_times_out_without_aborting() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/list/");
            then.status(200)
                .body(listing_page(&[("Slow ad", "/buysell/301/")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/301/");
            then.status(200)
                .delay(Duration::from_secs(3))
                .body(details_page("Feb-05-2021 07:00:00"));
        })
        .await;

    let summary = engine(&server).run().await.unwrap();

    assert_eq!(summary.scraped, 1);
    assert!(summary.fresh.is_empty());
    assert!(matches!(
        summary.diagnostics[0].kind,
        DiagnosticKind::SecondaryFetch(TransportError::Timeout { .. })
    ));
}

#[tokio::test]
async fn test_rejected_sms_is_reported_in_summary() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/list/");
            then.status(200)
                .body(listing_page(&[("Fresh ad", "/buysell/401/")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/401/");
            then.status(200).body(details_page("Feb-05-2021 07:00:00"));
        })
        .await;
    let sms_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/2010-04-01/Accounts/AC0123/Messages.json");
            then.status(401)
                .json_body(serde_json::json!({"code": 20003, "message": "Authenticate"}));
        })
        .await;

    let summary = engine(&server).run().await.unwrap();

    // no retry
    assert_eq!(sms_mock.hits_async().await, 1);
    assert_eq!(summary.fresh.len(), 1);
    assert!(matches!(
        summary.notify_error(),
        Some(NotifyError::Rejected { status: 401, body, .. }) if body.contains("Authenticate")
    ));
}

#[tokio::test]
async fn test_engine_from_toml_config_with_console_notifier() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body(
                r#"<ul>
                     <li class="result"><a href="/ad/7/">Cotic FlareMAX</a></li>
                   </ul>"#,
            );
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ad/7/");
            then.status(200).body(
                r#"<section class="meta">Posted Feb-05-2020 11:11:11</section>"#,
            );
        })
        .await;

    let toml_content = format!(
        r#"
[source]
url = "{}"
timeout_seconds = 2
concurrent_requests = 1

[page]
item_selector = "li.result"
title_anchor_index = 0
details_selector = "section.meta"
details_index = 0

[alert]
recipient = "me"

[notifier]
type = "console"
"#,
        server.url("/search")
    );
    let config = listing_alert::AlertConfig::from_toml_str(&toml_content).unwrap();

    let summary = AlertEngine::from_config(&config)
        .unwrap()
        .with_clock(Box::new(FixedClock::on(
            NaiveDate::from_ymd_opt(2021, 2, 5).unwrap(),
        )))
        .run()
        .await
        .unwrap();

    // posted a year earlier on the same day and month: still counted as new
    assert_eq!(summary.fresh.len(), 1);
    assert_eq!(summary.fresh[0].title, "Cotic FlareMAX");
    assert_eq!(summary.notification, NotificationStatus::Sent);
}
