//! Integration tests for `VersionChecker` against a wiremock tags endpoint.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pickwatch_poller::VersionChecker;

fn checker_for(server: &MockServer, local: &str) -> VersionChecker {
    VersionChecker::with_base_url(
        5,
        "pickwatch-test/0.1",
        "pickwatch/pickwatch",
        local,
        &server.uri(),
    )
    .expect("failed to build test checker")
}

async fn mount_tags(server: &MockServer, names: &[&str]) {
    let tags: Vec<_> = names.iter().map(|n| json!({"name": n})).collect();
    Mock::given(method("GET"))
        .and(path("/repos/pickwatch/pickwatch/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&tags))
        .mount(server)
        .await;
}

#[tokio::test]
async fn newer_tag_flags_the_local_build_stale() {
    let server = MockServer::start().await;
    mount_tags(&server, &["1.2.9", "1.2.10", "1.1.0"]).await;

    let checker = checker_for(&server, "1.2.9");
    let state = checker.subscribe();
    checker.check().await;

    let snapshot = state.borrow();
    assert_eq!(snapshot.latest_known, "1.2.10");
    assert!(!snapshot.is_current);
    assert_eq!(snapshot.local, "1.2.9");
}

#[tokio::test]
async fn local_at_latest_is_current() {
    let server = MockServer::start().await;
    mount_tags(&server, &["1.2.9", "1.2.10"]).await;

    let checker = checker_for(&server, "1.2.10");
    let state = checker.subscribe();
    checker.check().await;

    let snapshot = state.borrow();
    assert!(snapshot.is_current);
    assert_eq!(snapshot.latest_known, "1.2.10");
}

#[tokio::test]
async fn local_ahead_of_latest_is_current() {
    let server = MockServer::start().await;
    mount_tags(&server, &["1.2.10"]).await;

    let checker = checker_for(&server, "2.0");
    let state = checker.subscribe();
    checker.check().await;

    assert!(state.borrow().is_current);
}

#[tokio::test]
async fn v_prefixed_tags_are_discarded() {
    let server = MockServer::start().await;
    mount_tags(&server, &["v9.9.9", "1.2.10", "v3.0"]).await;

    let checker = checker_for(&server, "1.2.10");
    let state = checker.subscribe();
    checker.check().await;

    let snapshot = state.borrow();
    assert_eq!(snapshot.latest_known, "1.2.10");
    assert!(snapshot.is_current);
}

#[tokio::test]
async fn only_v_prefixed_tags_leaves_state_unchanged() {
    let server = MockServer::start().await;
    mount_tags(&server, &["v1.0", "v2.0"]).await;

    let checker = checker_for(&server, "0.5");
    let state = checker.subscribe();
    checker.check().await;

    // No usable tag: the initial assumed-current state stands.
    let snapshot = state.borrow();
    assert_eq!(snapshot.latest_known, "0.5");
    assert!(snapshot.is_current);
}

#[tokio::test]
async fn transport_failure_leaves_previous_state_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/pickwatch/pickwatch/tags"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&json!([{"name": "1.3.0"}, {"name": "1.2.0"}])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let checker = checker_for(&server, "1.2.0");
    let state = checker.subscribe();

    checker.check().await;
    assert_eq!(state.borrow().latest_known, "1.3.0");
    assert!(!state.borrow().is_current);

    checker.check().await;
    assert_eq!(
        state.borrow().latest_known,
        "1.3.0",
        "failed check must not disturb the previous state"
    );
}

#[tokio::test]
async fn malformed_tags_body_leaves_state_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let checker = checker_for(&server, "1.0.0");
    let state = checker.subscribe();
    checker.check().await;

    let snapshot = state.borrow();
    assert_eq!(snapshot.latest_known, "1.0.0");
    assert!(snapshot.is_current);
}
