mod common;

use std::sync::Arc;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use modmed_gateway::StaticCredentials;
use modmed_gateway::token::{TokenManager, TokenManagerConfig};

use common::clock::ManualClock;
use common::{credentials, grant_body, init_logging};

const GRANT_PATH: &str = "/firm-abc/ema/ws/oauth2/grant";
const EXPIRES_IN: i64 = 3600;

fn manager(server: &MockServer, clock: Arc<ManualClock>) -> TokenManager<StaticCredentials> {
    TokenManager::with_parts(
        reqwest::Client::new(),
        Arc::new(StaticCredentials::new(credentials(&server.uri()))),
        TokenManagerConfig::default(),
        clock,
    )
}

#[tokio::test]
async fn caches_token_until_expiry() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRANT_PATH))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(header("x-api-key", "key-abc"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=svc-user"))
        .and(body_string_contains("password=svc-pass"))
        .respond_with(ResponseTemplate::new(200).set_body_string(grant_body("token-123", EXPIRES_IN)))
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(0));
    let manager = manager(&server, clock.clone());

    let first = manager.bearer_token().await.expect("first grant");
    assert_eq!(first, "token-123");

    let second = manager.bearer_token().await.expect("cache hit");
    assert_eq!(second, "token-123");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "second call must not reach upstream");
}

#[tokio::test]
async fn refetches_once_the_margin_elapses() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRANT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(grant_body("token-123", EXPIRES_IN)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRANT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(grant_body("token-456", EXPIRES_IN)))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(0));
    let manager = manager(&server, clock.clone());

    assert_eq!(manager.bearer_token().await.expect("first grant"), "token-123");

    // One millisecond inside the margin-adjusted window the cache still holds.
    clock.set((EXPIRES_IN - 60) * 1000 - 1);
    assert_eq!(manager.bearer_token().await.expect("cache hit"), "token-123");

    // The boundary instant itself is expired.
    clock.set((EXPIRES_IN - 60) * 1000);
    assert_eq!(manager.bearer_token().await.expect("refetch"), "token-456");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn concurrent_misses_share_one_grant() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRANT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(grant_body("token-123", EXPIRES_IN))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(0));
    let manager = Arc::new(manager(&server, clock));

    let (a, b, c) = tokio::join!(
        manager.bearer_token(),
        manager.bearer_token(),
        manager.bearer_token(),
    );

    assert_eq!(a.expect("a"), "token-123");
    assert_eq!(b.expect("b"), "token-123");
    assert_eq!(c.expect("c"), "token-123");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "misses must collapse into one exchange");
}
