mod common;

use common::{MockReply, MockTransport};
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use taskdesk::api::ApiClient;
use taskdesk::stores::NotificationStore;

fn store_with(transport: &Arc<MockTransport>) -> NotificationStore {
    NotificationStore::new(Arc::new(ApiClient::new(
        "http://tasks.test",
        transport.clone(),
    )))
}

fn three_notifications() -> MockReply {
    MockReply::ok(json!([
        { "id": 1, "message": "assigned to you", "is_read": false },
        { "id": 2, "message": "status changed", "is_read": true },
        { "id": 3, "message": "new comment", "is_read": false }
    ]))
}

#[tokio::test]
async fn test_fetch_counts_unread() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", three_notifications());
    let store = store_with(&transport);

    store.fetch_all().await;

    assert_eq!(store.notifications().len(), 3);
    assert_eq!(store.unread_count(), 2);
}

#[tokio::test]
async fn test_fetch_accepts_enveloped_list() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/notifications",
        MockReply::ok(json!({ "data": [{ "id": 1, "is_read": false }] })),
    );
    let store = store_with(&transport);

    store.fetch_all().await;

    assert_eq!(store.unread_count(), 1);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_mark_read_decrements_once() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", three_notifications());
    transport.on(Method::POST, "/notifications/1/read", MockReply::ok(json!({ "id": 1 })));
    let store = store_with(&transport);
    store.fetch_all().await;

    store.mark_read(1).await.unwrap();
    assert_eq!(store.unread_count(), 1);

    // Marking the same notification again does not move the count
    store.mark_read(1).await.unwrap();
    assert_eq!(store.unread_count(), 1);
    assert!(store.notifications().iter().find(|n| n.id == 1).unwrap().is_read);
}

#[tokio::test]
async fn test_concurrent_mark_read_same_id() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", three_notifications());
    transport.on(Method::POST, "/notifications/3/read", MockReply::ok(json!({ "id": 3 })));
    let store = store_with(&transport);
    store.fetch_all().await;

    let (a, b) = futures::join!(store.mark_read(3), store.mark_read(3));
    assert!(a.is_ok() && b.is_ok());

    assert_eq!(store.unread_count(), 1);
}

#[tokio::test]
async fn test_mark_read_failure_changes_nothing() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", three_notifications());
    transport.on(Method::POST, "/notifications/1/read", MockReply::ok(json!({ "id": 1 })));
    transport.on(
        Method::POST,
        "/notifications/1/read",
        MockReply::status(500, json!({ "error": "boom" })),
    );
    transport.on(
        Method::POST,
        "/notifications/3/read",
        MockReply::status(404, json!({ "error": "Notification not found" })),
    );
    let store = store_with(&transport);
    store.fetch_all().await;

    store.mark_read(1).await.unwrap();
    assert!(store.mark_read(1).await.is_err());
    assert_eq!(store.unread_count(), 1);

    let err = store.mark_read(3).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(store.unread_count(), 1);
    assert!(!store.notifications().iter().find(|n| n.id == 3).unwrap().is_read);
}

#[tokio::test]
async fn test_mark_all_read() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", three_notifications());
    transport.on(
        Method::POST,
        "/notifications/read-all",
        MockReply::ok(json!({ "message": "All notifications marked as read" })),
    );
    let store = store_with(&transport);
    store.fetch_all().await;

    store.mark_all_read().await.unwrap();

    assert_eq!(store.unread_count(), 0);
    assert!(store.notifications().iter().all(|n| n.is_read));
    assert_eq!(transport.count(Method::POST, "/notifications/read-all"), 1);
}

#[tokio::test]
async fn test_mark_all_read_failure_keeps_flags() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", three_notifications());
    transport.on(Method::POST, "/notifications/read-all", MockReply::Unreachable);
    let store = store_with(&transport);
    store.fetch_all().await;

    assert!(store.mark_all_read().await.is_err());
    assert_eq!(store.unread_count(), 2);
}

#[tokio::test]
async fn test_fetch_failure_is_absorbed() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", MockReply::Unreachable);
    let store = store_with(&transport);

    store.fetch_all().await;

    assert!(store.notifications().is_empty());
    assert_eq!(store.unread_count(), 0);
    assert!(store.error().is_some());
    assert!(!store.status().loading);
}
