//! Type definitions for the QR login helper
//!
//! This module contains the wire formats of the passport endpoints and the
//! records handed between the login components.

pub mod challenge;
pub mod cookie;
pub mod poll;
pub mod serde_helpers;

pub use challenge::{Challenge, ChallengeData, ChallengeEnvelope};
pub use cookie::StoredCookie;
pub use poll::{LoginState, PollData, PollEnvelope, PollResult, PollStatus};
