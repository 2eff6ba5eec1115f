mod common;

use common::{mount_challenge, test_client, IDENTITY, TOKEN};
use fash_ai::{FashError, SessionState};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_authenticate_replaces_token() {
    let server = MockServer::start().await;

    // The pre-auth call carries the identity as both headers.
    Mock::given(method("GET"))
        .and(path("/sys/challenge/token"))
        .and(header("x-identity-id", IDENTITY))
        .and(header("x-auth-challenge", IDENTITY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "challenge_token": TOKEN }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut client, _clock) = test_client(&server);
    client.authenticate().await.unwrap();

    assert_eq!(
        client.session().state(),
        &SessionState::Authenticated {
            token: TOKEN.to_string()
        }
    );
    assert_eq!(client.session().token(), TOKEN);
}

#[tokio::test]
async fn test_authenticate_sends_browser_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sys/challenge/token"))
        .and(header("origin", "https://headshotmaster.io"))
        .and(header("referer", "https://headshotmaster.io/"))
        .and(header("sec-ch-ua-mobile", "?1"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "challenge_token": TOKEN }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut client, _clock) = test_client(&server);
    client.authenticate().await.unwrap();
}

#[tokio::test]
async fn test_authenticate_without_token_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sys/challenge/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let (mut client, _clock) = test_client(&server);
    let err = client.authenticate().await.unwrap_err();

    assert!(matches!(err, FashError::Authentication(_)));
    assert_eq!(client.session().state(), &SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_authenticate_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sys/challenge/token"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "blocked" })))
        .mount(&server)
        .await;

    let (mut client, _clock) = test_client(&server);
    let err = client.authenticate().await.unwrap_err();

    match err {
        FashError::Api { endpoint, message } => {
            assert_eq!(endpoint, "sys/challenge/token");
            assert!(message.contains("blocked"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_reauthentication_starts_from_identity() {
    let server = MockServer::start().await;
    mount_challenge(&server, TOKEN).await;

    let (mut client, _clock) = test_client(&server);
    client.authenticate().await.unwrap();
    client.authenticate().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(
            request.headers.get("x-auth-challenge").unwrap().to_str().unwrap(),
            IDENTITY
        );
    }
}
