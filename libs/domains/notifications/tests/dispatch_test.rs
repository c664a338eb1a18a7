//! End-to-end dispatch tests against an in-memory transport.
//!
//! These exercise the public API the way the platform's notification module
//! does: validated options in, requests through `NotificationProvider`.

mod common;

use common::{RecordingProvider, dispatcher, raw_options};
use domain_notifications::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_reset_password_reaches_transport() {
    let provider = RecordingProvider::new();
    let dispatcher = dispatcher("true", provider.clone());

    let outcome = dispatcher
        .send(NotificationRequest::new(
            "reset-password",
            json!({"url": "https://store.test/reset?token=t0k", "subject": "Reset"}),
        ))
        .await
        .unwrap();

    assert_eq!(serde_json::to_value(outcome).unwrap(), json!({"id": "msg_1"}));

    let sent = provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, ["ops@store.test"]);
    assert_eq!(sent[0].from, "shop@store.test");
    assert_eq!(sent[0].reply_to, "support@store.test");
    assert_eq!(sent[0].subject.as_deref(), Some("Reset"));
    assert!(sent[0].text_body.contains("https://store.test/reset?token=t0k"));
}

#[tokio::test]
async fn test_disabled_gate_never_reaches_transport() {
    let provider = RecordingProvider::new();
    let dispatcher = dispatcher("false", provider.clone());

    for template in ["order-placed", "reset-password"] {
        let outcome = dispatcher
            .send(NotificationRequest::new(template, json!({"subject": "S", "order": {}})))
            .await
            .unwrap();
        assert!(outcome.is_skipped(), "{template} should be skipped");
    }

    assert!(provider.sent().is_empty());
}

#[tokio::test]
async fn test_transport_failure_for_every_email_template() {
    let provider = RecordingProvider::failing("The store.test domain is not verified.");
    let dispatcher = dispatcher("true", provider.clone());

    let payloads = [
        ("order-placed", json!({"order": {"display_id": 1}})),
        ("order-placed", json!(null)),
        ("reset-password", json!({"url": "https://x"})),
        ("reset-password", json!({})),
    ];

    for (template, data) in payloads {
        let err = dispatcher
            .send(NotificationRequest::new(template, data))
            .await
            .unwrap_err();
        match err {
            NotificationError::ProviderSend(msg) => {
                assert_eq!(msg, "The store.test domain is not verified.")
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    assert_eq!(provider.sent().len(), 4);
}

#[tokio::test]
async fn test_feed_and_unknown_never_reach_transport() {
    let provider = RecordingProvider::new();
    let dispatcher = dispatcher("true", provider.clone());

    let ack = dispatcher
        .send_notification("order.feed.updated", json!({"x": 1}), None)
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(ack).unwrap(),
        json!({"to": "ops@store.test", "status": "success", "data": {"x": 1}})
    );

    let skipped = dispatcher
        .send(NotificationRequest::new("unknown-kind", json!({})))
        .await
        .unwrap();
    assert!(skipped.is_skipped());

    assert!(provider.sent().is_empty());
}

#[tokio::test]
async fn test_concurrent_dispatches_share_one_dispatcher() {
    let provider = RecordingProvider::new();
    let dispatcher = Arc::new(dispatcher("true", provider.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                dispatcher
                    .send(
                        NotificationRequest::new("reset-password", json!({"url": format!("https://x/{i}")}))
                            .with_to(format!("user{i}@buyer.test")),
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(matches!(handle.await.unwrap(), Ok(NotificationOutcome::Sent(_))));
    }

    let mut recipients: Vec<_> = provider.sent().into_iter().flat_map(|e| e.to).collect();
    recipients.sort();
    assert_eq!(recipients.len(), 8);
    assert_eq!(recipients[0], "user0@buyer.test");
}

#[test]
fn test_channels_always_include_feed_once() {
    for channels in [None, Some(vec![]), Some(vec!["feed".to_string(), "feed".to_string()])] {
        let options = ModuleOptions::validate(RawModuleOptions {
            channels: channels.clone(),
            ..raw_options("true")
        })
        .unwrap();
        let feeds = options.channels().iter().filter(|c| c.as_str() == "feed").count();
        assert_eq!(feeds, 1, "channels {channels:?}");
    }
}
