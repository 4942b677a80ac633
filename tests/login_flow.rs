//! End-to-end login flow against a mocked passport service

mod common;

use bili_qrlogin::{
    Error, LoginFlow, PassportClient, Settings, StatusPoller,
    login::LoginApi,
    storage::load_credentials,
};
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer, dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = server.uri();
    settings.polling.interval_ms = 20;
    settings.polling.timeout_ms = 5_000;
    settings.output.qrcode_path = dir.path().join("qrcode.png");
    settings.output.credentials_path = dir.path().join("cookies.json");
    settings
}

#[tokio::test]
async fn test_challenge_matches_response_body() {
    let server = MockServer::start().await;
    mount_challenge(&server).await;

    let dir = TempDir::new().unwrap();
    let client = PassportClient::new(&settings_for(&server, &dir).api).unwrap();
    let challenge = client.request_challenge().await.unwrap();

    let body = challenge_body();
    assert_eq!(challenge.login_url, body["data"]["url"].as_str().unwrap());
    assert_eq!(challenge.session_key, body["data"]["qrcode_key"].as_str().unwrap());
}

#[tokio::test]
async fn test_rejected_challenge_yields_no_challenge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -3,
            "message": "API校验密匙错误",
            "ttl": 1
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let flow = LoginFlow::new(settings_for(&server, &dir)).unwrap();
    let err = flow.run(&CancellationToken::new()).await.unwrap_err();

    match err {
        Error::ApiRejected { code, message } => {
            assert_eq!(code, -3);
            assert_eq!(message, "API校验密匙错误");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("qrcode.png").exists());
}

#[tokio::test]
async fn test_full_login_saves_cookies() {
    let server = MockServer::start().await;
    mount_challenge(&server).await;
    mount_poll_once(&server, ResponseTemplate::new(200).set_body_json(poll_body(86101, "未扫码"))).await;
    mount_poll_once(
        &server,
        ResponseTemplate::new(200).set_body_json(poll_body(86090, "二维码已扫码未确认")),
    )
    .await;
    mount_poll_once(&server, success_response()).await;

    let dir = TempDir::new().unwrap();
    let flow = LoginFlow::new(settings_for(&server, &dir)).unwrap();
    let outcome = flow.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.result.refresh_token, "a1b2c3d4e5f6a1b2c3d4e5f6");
    let names: Vec<_> = outcome.result.cookies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["DedeUserID", "SESSDATA", "bili_jct"]);

    let saved = load_credentials(&dir.path().join("cookies.json")).await.unwrap();
    assert_eq!(saved, outcome.result.cookies);
    assert!(saved[1].http_only);
    assert!(saved[1].secure);
    assert_eq!(saved[1].domain, "bilibili.com");

    assert!(dir.path().join("qrcode.png").exists());
}

#[tokio::test]
async fn test_poll_sends_session_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POLL_PATH))
        .and(query_param("qrcode_key", SESSION_KEY))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings = settings_for(&server, &dir);
    let client = PassportClient::new(&settings.api).unwrap();
    let poller = StatusPoller::new(&client, settings.polling.clone());

    let result = poller
        .poll(SESSION_KEY, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.cookies.len(), 3);
}

#[tokio::test]
async fn test_expiry_stops_polling() {
    let server = MockServer::start().await;
    mount_poll_once(&server, ResponseTemplate::new(200).set_body_json(poll_body(86101, "未扫码"))).await;
    mount_poll_once(
        &server,
        ResponseTemplate::new(200).set_body_json(poll_body(86038, "二维码已失效")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(POLL_PATH))
        .respond_with(success_response())
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings = settings_for(&server, &dir);
    let client = PassportClient::new(&settings.api).unwrap();
    let poller = StatusPoller::new(&client, settings.polling.clone());

    let err = poller
        .poll(SESSION_KEY, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Expired));
}

#[tokio::test]
async fn test_gateway_error_page_is_transient() {
    let server = MockServer::start().await;
    mount_poll_once(
        &server,
        ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
    )
    .await;
    mount_poll_once(&server, success_response()).await;

    let dir = TempDir::new().unwrap();
    let settings = settings_for(&server, &dir);
    let client = PassportClient::new(&settings.api).unwrap();
    let poller = StatusPoller::new(&client, settings.polling.clone());

    let result = poller.poll(SESSION_KEY, &CancellationToken::new()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_unreachable_server_is_fatal() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut settings = Settings::default();
    settings.api.base_url = format!("http://{}", addr);
    settings.polling.interval_ms = 20;
    settings.polling.timeout_ms = 5_000;
    let client = PassportClient::new(&settings.api).unwrap();
    let poller = StatusPoller::new(&client, settings.polling.clone());

    let err = poller
        .poll(SESSION_KEY, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_timeout_when_never_confirmed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POLL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(poll_body(86101, "未扫码")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut settings = settings_for(&server, &dir);
    settings.polling.interval_ms = 50;
    settings.polling.timeout_ms = 200;
    let client = PassportClient::new(&settings.api).unwrap();
    let poller = StatusPoller::new(&client, settings.polling.clone());

    let err = poller
        .poll(SESSION_KEY, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));

    let requests = server.received_requests().await.unwrap();
    assert!(!requests.is_empty());
    assert!(requests.len() <= 4);
}
