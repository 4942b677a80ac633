//! QR login core
//!
//! This module holds the passport API client, the cookie extractor, the
//! status polling loop and the flow that strings them together.

pub mod client;
pub mod cookies;
pub mod flow;
pub mod poller;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{LoginApi, PassportClient, PollExchange};
pub use cookies::extract_cookies;
pub use flow::{LoginFlow, LoginFlowGeneric, LoginOutcome, PendingLogin};
pub use poller::StatusPoller;
