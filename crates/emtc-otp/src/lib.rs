//! # emtc-otp
//!
//! One-time passcode challenges that authorize a field submission.
//!
//! A challenge is keyed by `(identifier, purpose)`, e.g. a phone number and
//! `"dpr_submit"`. Issuing replaces any live challenge for the key.
//! Verification is lazy: expiry is only evaluated when a code is checked,
//! and a matching code consumes the challenge under the same lock that
//! performed the comparison, so at most one caller ever sees `Success`.

pub mod clock;
pub mod delivery;
pub mod manager;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delivery::{CodeDelivery, DeliveryError, LogDelivery};
pub use manager::{OtpManager, VerificationOutcome};
pub use store::{Challenge, ChallengeKey, ChallengeStore};

use std::time::Duration;

/// Number of digits in an issued code.
pub const CODE_DIGITS: usize = 6;

/// Default lifetime of a challenge (15 minutes).
pub const DEFAULT_CHALLENGE_TTL: Duration = Duration::from_secs(900);
