//! End-to-end dispatch through the in-process publisher.

mod common;

use serde_json::json;
use tenantflow::domain::models::channel::{self, ChannelPrefix};
use tenantflow::DispatchError;

#[tokio::test]
async fn test_pattern_subscribers_see_every_user_notification() {
    common::setup_test_logging();
    let (bus, dispatcher) = common::memory_dispatcher();
    let mut all_users = bus.subscribe(&channel::user_notifications_pattern()).await;
    let mut only_seven = bus.subscribe(&channel::user_notifications("7")).await;

    let first = dispatcher
        .notify_user("7", "lease.expiring", json!({"days": 30}))
        .await
        .unwrap();
    let second = dispatcher
        .notify_user("8", "lease.expiring", json!({"days": 10}))
        .await
        .unwrap();

    assert_eq!(first.receivers, 2);
    assert_eq!(second.receivers, 1);

    assert_eq!(all_users.recv().await.unwrap().channel, "notifications:user:7");
    assert_eq!(all_users.recv().await.unwrap().channel, "notifications:user:8");
    assert_eq!(only_seven.recv().await.unwrap().channel, "notifications:user:7");
    assert!(only_seven.try_recv().is_none());
}

#[tokio::test]
async fn test_system_wide_pattern() {
    let (bus, dispatcher) = common::memory_dispatcher();
    let mut system = bus.subscribe(&ChannelPrefix::System.pattern()).await;

    dispatcher
        .system_event("cache.flushed", json!({"entity": "stats"}))
        .await
        .unwrap();

    let delivered = system.recv().await.unwrap();
    assert_eq!(delivered.channel, "system:events");
    let envelope = dispatcher.codec().parse_envelope(&delivered.message).unwrap();
    assert_eq!(envelope.payload["entity"], "stats");
}

#[tokio::test]
async fn test_publishing_without_subscribers_succeeds() {
    let (_bus, dispatcher) = common::memory_dispatcher();
    let receipt = dispatcher
        .notify_org("org-1", "billing.updated", json!(null))
        .await
        .unwrap();
    assert_eq!(receipt.receivers, 0);
    assert!(receipt.message_id.starts_with("msg_"));
}

#[tokio::test]
async fn test_unknown_channel_is_not_published() {
    let (bus, dispatcher) = common::memory_dispatcher();
    let mut everything = bus.subscribe("*").await;

    let err = dispatcher
        .publish("unknown:1", "x", json!(1), None)
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::InvalidChannel(_)));
    assert!(everything.try_recv().is_none());
}
