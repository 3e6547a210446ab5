mod common;

use common::{MockReply, MockTransport};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskdesk::models::Credentials;
use taskdesk::router::Navigation;
use taskdesk::session::{KeyValueStore, MemoryKeyValueStore, TOKEN_KEY};
use taskdesk::App;

fn app_with(storage: Arc<MemoryKeyValueStore>, transport: Arc<MockTransport>) -> App {
    App::new(
        "http://tasks.test/",
        storage,
        transport,
        Duration::from_millis(5000),
    )
}

#[tokio::test]
async fn test_session_survives_restart() {
    let storage = Arc::new(MemoryKeyValueStore::new());
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::POST,
        "/login",
        MockReply::ok(json!({ "token": "tok-9", "user_id": 9, "user_label": 2, "username": "carol" })),
    );
    transport.on(Method::GET, "/tasks", MockReply::ok(json!({ "data": [{ "ID": 1 }] })));

    let first = app_with(storage.clone(), transport.clone());
    assert!(matches!(
        first.router().navigate("/tasks", first.session()),
        Navigation::Redirect { .. }
    ));
    first
        .session()
        .login(&Credentials {
            username: "carol".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    drop(first);

    let second = app_with(storage.clone(), transport.clone());
    assert!(second.session().is_authenticated());
    assert_eq!(second.session().user().unwrap().username, "carol");
    assert!(matches!(
        second.router().navigate("/tasks", second.session()),
        Navigation::Proceed(_)
    ));

    second.tasks().fetch_all().await;
    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "http://tasks.test/tasks");
    assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "Bearer tok-9");
    assert_eq!(second.tasks().len(), 1);

    second.session().logout();
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

    let third = app_with(storage, transport);
    assert!(!third.session().is_authenticated());
}

#[tokio::test]
async fn test_stores_share_one_header_map() {
    let storage = Arc::new(MemoryKeyValueStore::new());
    storage.set(TOKEN_KEY, "restored").unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/notifications", MockReply::ok(json!([])));
    transport.on(Method::GET, "/groups", MockReply::ok(json!({ "data": [] })));

    let app = app_with(storage, transport.clone());
    app.notifications().fetch_all().await;
    app.session().logout();
    app.meta().groups().fetch_all().await;

    let requests = transport.requests();
    assert_eq!(
        requests[0].headers.get(AUTHORIZATION).unwrap(),
        "Bearer restored"
    );
    assert!(requests[1].headers.get(AUTHORIZATION).is_none());
    assert!(app.api().default_headers().get(AUTHORIZATION).is_none());
}
