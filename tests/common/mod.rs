//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATE_PATH: &str = "/x/passport-login/web/qrcode/generate";
pub const POLL_PATH: &str = "/x/passport-login/web/qrcode/poll";
pub const SESSION_KEY: &str = "0123456789abcdef0123456789abcdef";

/// Generate endpoint body with code 0
pub fn challenge_body() -> Value {
    json!({
        "code": 0,
        "message": "0",
        "ttl": 1,
        "data": {
            "url": format!("https://account.bilibili.com/h5/account-h5/auth/scan-web?navhide=1&qrcode_key={SESSION_KEY}&from="),
            "qrcode_key": SESSION_KEY
        }
    })
}

/// Poll endpoint body with the given login code
pub fn poll_body(inner_code: i64, message: &str) -> Value {
    json!({
        "code": 0,
        "message": "0",
        "ttl": 1,
        "data": {
            "url": if inner_code == 0 { "https://passport.biligame.com/crossDomain?DedeUserID=42" } else { "" },
            "refresh_token": if inner_code == 0 { "a1b2c3d4e5f6a1b2c3d4e5f6" } else { "" },
            "timestamp": if inner_code == 0 { 1_700_000_000_000i64 } else { 0 },
            "code": inner_code,
            "message": message
        }
    })
}

/// Successful poll reply carrying the usual session cookies
pub fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .append_header(
            "set-cookie",
            "DedeUserID=42; Path=/; Domain=bilibili.com; Expires=Wed, 01 Jan 2031 00:00:00 GMT",
        )
        .append_header(
            "set-cookie",
            "SESSDATA=abc%2C123%2Cdef; Path=/; Domain=bilibili.com; Expires=Wed, 01 Jan 2031 00:00:00 GMT; HttpOnly; Secure",
        )
        .append_header(
            "set-cookie",
            "bili_jct=0123456789abcdef; Path=/; Domain=bilibili.com; Expires=Wed, 01 Jan 2031 00:00:00 GMT",
        )
        .set_body_json(poll_body(0, ""))
}

/// Mount a challenge mock that succeeds once
pub async fn mount_challenge(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(challenge_body()))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount one poll reply that is used exactly once, in mount order
pub async fn mount_poll_once(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(POLL_PATH))
        .respond_with(response)
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}
