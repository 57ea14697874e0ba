#![allow(clippy::unwrap_used)]
// Integration tests for the collaborator clients using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hearth_api::{Error, GatewayClient, IdentityClient, OAuthClient};

// ── Helpers ─────────────────────────────────────────────────────────

fn secret(s: &str) -> SecretString {
    s.to_string().into()
}

async fn identity_client(server: &MockServer) -> IdentityClient {
    let url = Url::parse(&format!("{}/user/profile", server.uri())).unwrap();
    IdentityClient::with_client(reqwest::Client::new(), url)
}

async fn oauth_client(server: &MockServer) -> OAuthClient {
    let url = Url::parse(&format!("{}/auth/o2/token", server.uri())).unwrap();
    OAuthClient::with_client(reqwest::Client::new(), url)
}

// ── Identity tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_user_profile_success() {
    let server = MockServer::start().await;
    let client = identity_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .and(query_param("access_token", "valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": "amzn1.account.AABBCC",
            "name": "Test User",
            "email": "test@example.com"
        })))
        .mount(&server)
        .await;

    let profile = client.user_profile("valid-token").await.unwrap();

    assert_eq!(profile.user_id, "amzn1.account.AABBCC");
    assert_eq!(profile.name.as_deref(), Some("Test User"));
}

#[tokio::test]
async fn test_user_profile_provider_error_body() {
    let server = MockServer::start().await;
    let client = identity_client(&server).await;

    // Providers report invalid tokens in the body, sometimes with HTTP 200.
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "invalid_token",
            "error_description": "The access token is invalid"
        })))
        .mount(&server)
        .await;

    let result = client.user_profile("bad-token").await;

    match result {
        Err(Error::Identity { message }) => {
            assert_eq!(message, "The access token is invalid");
        }
        other => panic!("expected Identity error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_user_profile_http_error() {
    let server = MockServer::start().await;
    let client = identity_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let result = client.user_profile("expired").await;
    assert!(matches!(result, Err(Error::Identity { .. })));
}

// ── OAuth tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_exchange_grant_code() {
    let server = MockServer::start().await;
    let client = oauth_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/o2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=grant-code-1"))
        .and(body_string_contains("client_id=client-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let grant = client
        .exchange_grant_code("grant-code-1", "client-1", &secret("shh"), "https://cb")
        .await
        .unwrap();

    assert_eq!(grant.access_token, "access-1");
    assert_eq!(grant.refresh_token.expose_secret(), "refresh-1");
    assert_eq!(grant.token_type, "bearer");
    assert_eq!(grant.expires_in, 3600);
}

#[tokio::test]
async fn test_refresh_access_token() {
    let server = MockServer::start().await;
    let client = oauth_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/o2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "token_type": "bearer",
            "expires_in": 900
        })))
        .mount(&server)
        .await;

    let grant = client
        .refresh_access_token(&secret("old-refresh"), "client-1", &secret("shh"), "https://cb")
        .await
        .unwrap();

    assert_eq!(grant.access_token, "access-2");
    assert_eq!(grant.refresh_token.expose_secret(), "refresh-2");
}

#[tokio::test]
async fn test_token_exchange_error() {
    let server = MockServer::start().await;
    let client = oauth_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/o2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "The code has expired"
        })))
        .mount(&server)
        .await;

    let result = client
        .exchange_grant_code("stale", "client-1", &secret("shh"), "https://cb")
        .await;

    match result {
        Err(Error::TokenExchange { error, description }) => {
            assert_eq!(error, "invalid_grant");
            assert_eq!(description, "The code has expired");
        }
        other => panic!("expected TokenExchange error, got: {other:?}"),
    }
}

// ── Gateway tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_post_event_accepted() {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = GatewayClient::with_client(reqwest::Client::new(), base);

    Mock::given(method("POST"))
        .and(path("/v3/events"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let receipt = client
        .post_event("tok-1", &json!({"event": {"header": {}}}))
        .await
        .unwrap();

    assert_eq!(receipt.status, 202);
}

#[tokio::test]
async fn test_post_event_rejected() {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = GatewayClient::with_client(reqwest::Client::new(), base);

    Mock::given(method("POST"))
        .and(path("/v3/events"))
        .respond_with(ResponseTemplate::new(403).set_body_string("skill disabled"))
        .mount(&server)
        .await;

    let result = client.post_event("tok-1", &json!({})).await;

    match result {
        Err(Error::Delivery { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "skill disabled");
        }
        other => panic!("expected Delivery error, got: {other:?}"),
    }
}
