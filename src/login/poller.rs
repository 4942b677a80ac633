//! # Status Poller
//!
//! Drives one login challenge to a terminal outcome by querying the status
//! endpoint at a fixed interval until the user confirms, the QR code expires,
//! or the polling budget runs out.
//!
//! ## Outcomes
//!
//! | Observation                         | Result                         |
//! |-------------------------------------|--------------------------------|
//! | outer 0, inner 0                    | `Ok(PollResult)`               |
//! | 86038 (outer, or inner with outer 0)| [`Error::Expired`]             |
//! | 86090 / 86101                       | keep polling                   |
//! | undecodable body                    | keep polling                   |
//! | any other code                      | keep polling, or [`Error::UnexpectedStatus`] in strict mode |
//! | transport failure                   | returned immediately           |
//! | budget exhausted                    | [`Error::Timeout`]             |
//! | token cancelled                     | [`Error::Cancelled`]           |
//!
//! Every wait (request or sleep) is raced against a [`CancellationToken`] so a
//! caller can abort the loop early.

use crate::{
    Error, Result,
    config::settings::PollingSettings,
    login::client::{LoginApi, PollExchange},
    types::{LoginState, PollEnvelope, PollResult, PollStatus},
};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// Longest body excerpt written to the log for undecodable responses
const BODY_EXCERPT_LEN: usize = 200;

/// Bounded polling loop over a [`LoginApi`]
#[derive(Debug)]
pub struct StatusPoller<'a, A: LoginApi> {
    api: &'a A,
    settings: PollingSettings,
}

impl<'a, A: LoginApi> StatusPoller<'a, A> {
    /// Create a poller with the given interval, budget and strictness
    pub fn new(api: &'a A, settings: PollingSettings) -> Self {
        Self { api, settings }
    }

    /// Poll until a terminal outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::Session`] for an empty session key
    /// - transport errors from the [`LoginApi`], unchanged
    /// - [`Error::Expired`], [`Error::Timeout`], [`Error::Cancelled`]
    /// - [`Error::UnexpectedStatus`] for unknown codes when strict
    pub async fn poll(&self, session_key: &str, cancel: &CancellationToken) -> Result<PollResult> {
        if session_key.is_empty() {
            return Err(Error::session("session key must not be empty"));
        }

        let interval = self.settings.interval();
        let timeout = self.settings.timeout();
        let started = Instant::now();
        let mut state = LoginState::Requested;
        let mut attempt: u32 = 0;

        tracing::info!(
            "Polling login status every {:?} for up to {:?}",
            interval,
            timeout
        );

        while started.elapsed() < timeout {
            attempt += 1;

            let exchange = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                result = self.api.poll_status(session_key) => result?,
            };

            if let Some(result) = self.handle_exchange(exchange, &mut state, attempt)? {
                return Ok(result);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = sleep(interval) => {}
            }
        }

        tracing::info!(
            "Login state changed: {} -> {} after {} attempts",
            state,
            LoginState::TimedOut,
            attempt
        );
        Err(Error::Timeout { waited: timeout })
    }

    /// Decode and classify one exchange; `Some` on success
    fn handle_exchange(
        &self,
        exchange: PollExchange,
        state: &mut LoginState,
        attempt: u32,
    ) -> Result<Option<PollResult>> {
        let envelope: PollEnvelope = match serde_json::from_str(&exchange.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(
                    "Poll #{} returned an undecodable body (HTTP {}): {}; body starts with {:?}",
                    attempt,
                    exchange.http_status,
                    e,
                    body_excerpt(&exchange.body)
                );
                return Ok(None);
            }
        };

        let status = envelope.status();
        tracing::debug!(
            "Poll #{}: outer={} status={:?} cookies={}",
            attempt,
            envelope.code,
            status,
            exchange.cookies.len()
        );

        let next = state.advance(status);
        if next != *state {
            tracing::info!("Login state changed: {} -> {}", state, next);
            *state = next;
        }

        match status {
            PollStatus::Confirmed => Ok(Some(PollResult::from_envelope(
                envelope,
                exchange.cookies,
            ))),
            PollStatus::Expired => Err(Error::Expired),
            PollStatus::Scanned | PollStatus::AwaitingScan => Ok(None),
            PollStatus::Unknown(code) => {
                let message = envelope.best_message().to_string();
                if self.settings.strict_status_codes {
                    return Err(Error::UnexpectedStatus { code, message });
                }
                tracing::warn!(
                    "Poll #{} returned unknown status [{}] {}, continuing",
                    attempt,
                    code,
                    message
                );
                Ok(None)
            }
        }
    }
}

fn body_excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
