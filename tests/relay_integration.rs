//! Integration tests for the inquiry relay.
//!
//! Each test spins up the Axum router on a random port, mocks the Telegram
//! Bot API with wiremock, and exercises the real HTTP contract, either with
//! raw reqwest calls or through the intake controller.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use inquiry_relay::config::{NotificationConfig, NotificationSource};
use inquiry_relay::inquiry::{Field, GENERIC_FAILURE_MESSAGE};
use inquiry_relay::intake::{HttpTransport, IntakeController, IntakeState, SubmitOutcome};
use inquiry_relay::relay::{RelayState, relay_routes};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start the relay on a random port with a fixed notification snapshot.
async fn start_relay(config: NotificationConfig) -> String {
    let app = relay_routes(RelayState::new(NotificationSource::Fixed(config)));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

/// Telegram mock answering `sendMessage` with the given status.
async fn telegram_mock(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bottest-token/sendMessage"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"ok": status == 200})))
        .mount(&server)
        .await;
    server
}

fn configured(telegram: &MockServer) -> NotificationConfig {
    NotificationConfig::with_credentials("test-token", "42").with_api_base(telegram.uri())
}

fn kim() -> Value {
    json!({
        "name": "Kim",
        "contact": "010-1234-5678",
        "location": "Hannam-dong",
        "area": "50py"
    })
}

async fn post_json(base: &str, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/inquiry"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// ── Relay contract ───────────────────────────────────────────────────

#[tokio::test]
async fn valid_inquiry_is_delivered_and_accepted() {
    timeout(TEST_TIMEOUT, async {
        let telegram = telegram_mock(200).await;
        let base = start_relay(configured(&telegram)).await;

        let (status, body) = post_json(&base, &kim()).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"success": true}));

        let requests = telegram.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["chat_id"], "42");
        let text = sent["text"].as_str().unwrap();
        for value in ["Kim", "010-1234-5678", "Hannam-dong", "50py"] {
            assert!(text.contains(value));
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unconfigured_channel_skips_dispatch_and_accepts() {
    timeout(TEST_TIMEOUT, async {
        let telegram = telegram_mock(200).await;
        let config = NotificationConfig::default().with_api_base(telegram.uri());
        let base = start_relay(config).await;

        let (status, body) = post_json(&base, &kim()).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"success": true}));
        assert!(telegram.received_requests().await.unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

// Delivery failure is swallowed on purpose: the client still gets success.
#[tokio::test]
async fn telegram_error_status_still_accepts() {
    timeout(TEST_TIMEOUT, async {
        let telegram = telegram_mock(500).await;
        let base = start_relay(configured(&telegram)).await;

        let (status, body) = post_json(&base, &kim()).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"success": true}));
        assert_eq!(telegram.received_requests().await.unwrap().len(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_telegram_is_generic_failure() {
    timeout(TEST_TIMEOUT, async {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let dead = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
        drop(listener);

        let config =
            NotificationConfig::with_credentials("test-token", "42").with_api_base(dead);
        let base = start_relay(config).await;

        let (status, body) = post_json(&base, &kim()).await;
        assert_eq!(status, 500);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], GENERIC_FAILURE_MESSAGE);
        assert!(!body.to_string().contains("test-token"));
    })
    .await
    .expect("test timed out");
}

/// Valid inquiries in the shapes the form can produce.
fn valid_inquiries() -> Vec<Value> {
    vec![
        kim(),
        json!({
            "name": "이서연",
            "contact": "02-123-4567",
            "location": "성수동",
            "area": "32평"
        }),
        json!({
            "name": "Park",
            "contact": "01012345678",
            "location": "Seongsu-dong",
            "area": "24py"
        }),
        json!({
            "name": "  최민준 ",
            "contact": " 010-9876-5432",
            "location": "한남동 / 3층 ",
            "area": " 50평"
        }),
        json!({
            "name": "O'Brien & Co.",
            "contact": "031-123-4567",
            "location": "Pangyo <B1>",
            "area": "120py"
        }),
    ]
}

/// How the Telegram side behaves for one run.
#[derive(Debug, Clone, Copy)]
enum ChannelMode {
    Delivers,
    Rejects(u16),
    Unconfigured,
}

// Acceptance never depends on the channel: every valid inquiry gets
// `{success:true}` whether Telegram delivers, refuses, or is not set up.
#[tokio::test]
async fn every_valid_inquiry_is_accepted_in_every_channel_mode() {
    timeout(TEST_TIMEOUT, async {
        let inquiries = valid_inquiries();

        for mode in [
            ChannelMode::Delivers,
            ChannelMode::Rejects(400),
            ChannelMode::Rejects(503),
            ChannelMode::Unconfigured,
        ] {
            let telegram = match mode {
                ChannelMode::Rejects(status) => telegram_mock(status).await,
                ChannelMode::Delivers | ChannelMode::Unconfigured => telegram_mock(200).await,
            };
            let config = match mode {
                ChannelMode::Unconfigured => {
                    NotificationConfig::default().with_api_base(telegram.uri())
                }
                _ => configured(&telegram),
            };
            let base = start_relay(config).await;

            for inquiry in &inquiries {
                let (status, body) = post_json(&base, inquiry).await;
                assert_eq!(status, 200, "{mode:?}: {inquiry}");
                assert_eq!(body, json!({"success": true}), "{mode:?}: {inquiry}");
            }

            let requests = telegram.received_requests().await.unwrap();
            match mode {
                ChannelMode::Unconfigured => assert!(requests.is_empty()),
                _ => assert_eq!(requests.len(), inquiries.len(), "{mode:?}"),
            }

            // Field values reach the operator verbatim, spaces included.
            for (request, inquiry) in requests.iter().zip(&inquiries) {
                let sent: Value = serde_json::from_slice(&request.body).unwrap();
                let text = sent["text"].as_str().unwrap();
                for key in ["name", "contact", "location", "area"] {
                    let value = inquiry[key].as_str().unwrap();
                    assert!(text.contains(value), "{mode:?}: {value:?} missing");
                }
            }
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn malformed_bodies_are_rejected_without_dispatch() {
    timeout(TEST_TIMEOUT, async {
        let telegram = telegram_mock(200).await;
        let base = start_relay(configured(&telegram)).await;
        let client = reqwest::Client::new();

        for raw in [
            "not json",
            "[]",
            "42",
            r#"{"name":"Kim","contact":"010-1234-5678"}"#,
        ] {
            let resp = client
                .post(format!("{base}/api/inquiry"))
                .header("content-type", "application/json")
                .body(raw)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 500, "body {raw:?}");
            let body: Value = resp.json().await.unwrap();
            assert_eq!(
                body,
                json!({"success": false, "error": GENERIC_FAILURE_MESSAGE})
            );
        }

        assert!(telegram.received_requests().await.unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let base = start_relay(NotificationConfig::default()).await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    })
    .await
    .expect("test timed out");
}

// ── Controller against the real relay ────────────────────────────────

async fn filled_controller() -> IntakeController {
    let controller = IntakeController::new();
    controller.open().await;
    controller.edit(Field::Name, "Kim").await;
    controller.edit(Field::Contact, "010-1234-5678").await;
    controller.edit(Field::Location, "Hannam-dong").await;
    controller.edit(Field::Area, "50py").await;
    controller
}

#[tokio::test]
async fn controller_submission_end_to_end() {
    timeout(TEST_TIMEOUT, async {
        let telegram = telegram_mock(200).await;
        let base = start_relay(configured(&telegram)).await;
        let transport = HttpTransport::new(format!("{base}/api/inquiry"));

        let controller = filled_controller().await;
        assert_eq!(controller.submit(&transport).await, SubmitOutcome::Accepted);

        let view = controller.view().await;
        assert_eq!(view.state, IntakeState::Success);
        for field in Field::ALL {
            assert_eq!(view.fields.field(field), "");
        }
        assert_eq!(telegram.received_requests().await.unwrap().len(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn controller_keeps_fields_when_relay_fails() {
    timeout(TEST_TIMEOUT, async {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let dead = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
        drop(listener);

        let base = start_relay(
            NotificationConfig::with_credentials("test-token", "42").with_api_base(dead),
        )
        .await;
        let transport = HttpTransport::new(format!("{base}/api/inquiry"));

        let controller = filled_controller().await;
        assert_eq!(controller.submit(&transport).await, SubmitOutcome::Failed);

        let view = controller.view().await;
        assert_eq!(view.state, IntakeState::Error);
        assert_eq!(view.fields.name, "Kim");
        assert_eq!(view.fields.area, "50py");
    })
    .await
    .expect("test timed out");
}
