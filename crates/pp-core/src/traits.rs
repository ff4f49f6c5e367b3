//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary or the
//! operator client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Book;

/// Key/value persistence for session state (token, password, pending code,
/// book list). Values are opaque strings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Source of the current time, injected so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(any(test, feature = "testing"))]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(start),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Server-side admin credential and token contract.
#[async_trait]
pub trait AdminAuth: Send + Sync {
    /// Checks a login attempt against the current admin password.
    async fn verify_password(&self, password: &str) -> bool;

    /// Replaces the admin password. Length is checked by the caller.
    async fn change_password(&self, new_password: &str) -> anyhow::Result<()>;

    /// Issues a bearer token for a successful login.
    fn issue_token(&self) -> anyhow::Result<String>;

    /// Returns whether a presented bearer token is acceptable.
    fn verify_token(&self, token: &str) -> bool;
}

/// Body of a format request; `post_title` selects the extended variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRequest {
    pub books: Option<Vec<Book>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

/// Turns a book list into post text, locally or through the backend.
#[async_trait]
pub trait PostFormatter: Send + Sync {
    async fn format(&self, token: Option<&str>, request: &FormatRequest) -> Result<String>;
}
