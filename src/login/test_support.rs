//! Scripted [`LoginApi`] for unit tests.

use super::client::{LoginApi, PollExchange};
use crate::{Error, Result, types::Challenge, types::StoredCookie};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One scripted poll reply
#[derive(Debug, Clone)]
pub enum Step {
    /// Reply with this body and cookies
    Body(String, Vec<StoredCookie>),
    /// Fail with a transport error
    Transport,
}

impl Step {
    /// Poll body with the given outer and inner codes
    pub fn codes(outer: i64, inner: i64) -> Self {
        Self::Body(
            serde_json::json!({
                "code": outer,
                "message": "0",
                "data": {
                    "url": "",
                    "refresh_token": "",
                    "timestamp": 0,
                    "code": inner,
                    "message": ""
                }
            })
            .to_string(),
            Vec::new(),
        )
    }

    /// Successful login with cookies
    pub fn success(cookies: Vec<StoredCookie>) -> Self {
        Self::Body(
            serde_json::json!({
                "code": 0,
                "message": "0",
                "data": {
                    "url": "https://passport.biligame.com/crossDomain?DedeUserID=42",
                    "refresh_token": "refresh-0123456789",
                    "timestamp": 1_700_000_000_000i64,
                    "code": 0,
                    "message": ""
                }
            })
            .to_string(),
            cookies,
        )
    }

    /// Not scanned yet
    pub fn pending() -> Self {
        Self::codes(0, 86101)
    }
}

/// Replays a fixed challenge and a queue of poll replies.
///
/// Once the queue is empty every poll answers "not scanned".
#[derive(Debug)]
pub struct ScriptedApi {
    challenge: Option<Challenge>,
    steps: Mutex<VecDeque<Step>>,
    polls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            challenge: Some(Challenge::new(
                "https://account.bilibili.com/h5/account-h5/auth/scan-web?qrcode_key=scripted",
                "scripted",
            )),
            steps: Mutex::new(steps.into_iter().collect()),
            polls: AtomicUsize::new(0),
        }
    }

    /// Challenge requests are rejected with code -412
    pub fn rejecting_challenge() -> Self {
        Self {
            challenge: None,
            ..Self::new(Vec::<Step>::new())
        }
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoginApi for ScriptedApi {
    async fn request_challenge(&self) -> Result<Challenge> {
        self.challenge
            .clone()
            .ok_or_else(|| Error::api_rejected(-412, "请求被拦截"))
    }

    async fn poll_status(&self, _session_key: &str) -> Result<PollExchange> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .map_err(|_| Error::internal("scripted api lock poisoned"))?
            .pop_front()
            .unwrap_or_else(Step::pending);

        match step {
            Step::Body(body, cookies) => Ok(PollExchange {
                http_status: 200,
                cookies,
                body,
            }),
            Step::Transport => Err(Error::HttpStatus { status: 502 }),
        }
    }
}
