//! Integration tests for the caching token provider

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use timedetect_client::{AuthConfig, ClientError, TokenProvider};

fn auth_config(server: &MockServer) -> AuthConfig {
    AuthConfig {
        token_url: format!("{}/connect/token", server.uri()),
        client_id: "demo-client".to_string(),
        client_secret: "s3cret".to_string(),
        scope: "timedetect-api".to_string(),
    }
}

#[tokio::test]
async fn test_fresh_token_is_served_from_the_cache() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=demo-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut tokens = TokenProvider::new(auth_config(&server));
    assert_eq!(tokens.get_token().await.unwrap(), "tok-1");
    assert_eq!(tokens.get_token().await.unwrap(), "tok-1");
}

#[tokio::test]
async fn test_expired_token_triggers_a_new_exchange() {
    let server = MockServer::start().await;

    // A zero-second lifetime expires the cache entry immediately.
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": 0,
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-2",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;

    let mut tokens = TokenProvider::new(auth_config(&server));
    assert_eq!(tokens.get_token().await.unwrap(), "tok-1");
    assert_eq!(tokens.get_token().await.unwrap(), "tok-2");
}

#[tokio::test]
async fn test_failed_exchange_is_reported_and_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;

    let mut tokens = TokenProvider::new(auth_config(&server));

    let err = tokens.get_token().await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 503, .. }));

    // The next attempt succeeds; the failure left no poisoned state behind.
    assert_eq!(tokens.get_token().await.unwrap(), "tok-1");
}
