//! # One-Time Codes
//!
//! Six-digit codes with an absolute expiry. Only one code is outstanding at a
//! time; issuing a new one overwrites the stored value.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const CODE_LENGTH: usize = 6;
pub const CODE_TTL_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeCode {
    pub code: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Draws a fresh random code valid for `ttl` from `now`.
    pub fn issue(now: DateTime<Utc>, ttl: Duration) -> Result<Self> {
        let mut buf = [0u8; 4];
        getrandom::getrandom(&mut buf)
            .map_err(|e| AppError::Internal(format!("random source unavailable: {e}")))?;
        let value = u32::from_le_bytes(buf) % 1_000_000;

        Ok(Self {
            code: format!("{value:06}"),
            expires_at: now + ttl,
        })
    }

    /// Expired strictly after `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn matches(&self, submitted: &str) -> bool {
        is_well_formed(submitted.trim()) && self.code == submitted.trim()
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// Exactly six ASCII digits.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
