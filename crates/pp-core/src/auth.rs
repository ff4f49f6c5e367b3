//! # Operator Authentication
//!
//! Single-operator login flow: bootstrap password, forced password change,
//! optional one-time-code step, logout. The flow is an explicit
//! [`AuthPhase`]; the persisted pieces (token, password, pending code) live
//! in an injected [`SessionStore`] so a reload restores the same phase.
//!
//! Expected failures (wrong password, wrong or expired code) come back as
//! `Ok(false)`. `Err` is reserved for validation of a new password and for
//! storage failures.

use std::sync::Arc;

use chrono::Duration;
use log::{info, warn};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::keys;
use crate::otp::{OneTimeCode, CODE_TTL_SECS};
use crate::traits::{Clock, SessionStore};

/// Same literal as the backend's default admin password.
pub const DEFAULT_BOOTSTRAP_PASSWORD: &str = "admin123";
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Accepted only while no password has been set. The default mirrors
    /// the backend's default `admin_password`, so a fresh client and a fresh
    /// server accept the same first password. Override it to use a
    /// client-only secret.
    pub bootstrap_password: String,
    /// Returning logins go through a one-time code when enabled.
    pub two_factor: bool,
    pub code_ttl: Duration,
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bootstrap_password: DEFAULT_BOOTSTRAP_PASSWORD.to_string(),
            two_factor: true,
            code_ttl: Duration::seconds(CODE_TTL_SECS),
            min_password_len: MIN_PASSWORD_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Before the first restore from the store.
    Uninitialized,
    /// `requires_password_change` survives logout until a password is set.
    Unauthenticated { requires_password_change: bool },
    ForcedPasswordChange,
    TwoFactorPending,
    Authenticated,
}

/// Which screen the operator UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Login,
    PasswordChange,
    TwoFactor,
    Main,
}

impl AuthPhase {
    pub fn screen(self) -> Screen {
        match self {
            AuthPhase::Uninitialized => Screen::Loading,
            AuthPhase::Unauthenticated { .. } => Screen::Login,
            AuthPhase::ForcedPasswordChange => Screen::PasswordChange,
            AuthPhase::TwoFactorPending => Screen::TwoFactor,
            AuthPhase::Authenticated => Screen::Main,
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(
            self,
            AuthPhase::ForcedPasswordChange | AuthPhase::TwoFactorPending | AuthPhase::Authenticated
        )
    }
}

/// Flag view of a phase, in the shape the UI layer consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_initialized: bool,
    pub is_authenticated: bool,
    pub is_two_factor_enabled: bool,
    pub requires_password_change: bool,
}

impl From<AuthPhase> for AuthState {
    fn from(phase: AuthPhase) -> Self {
        match phase {
            AuthPhase::Uninitialized => AuthState::default(),
            AuthPhase::Unauthenticated {
                requires_password_change,
            } => AuthState {
                is_initialized: true,
                requires_password_change,
                ..AuthState::default()
            },
            AuthPhase::ForcedPasswordChange => AuthState {
                is_initialized: true,
                is_authenticated: true,
                requires_password_change: true,
                ..AuthState::default()
            },
            AuthPhase::TwoFactorPending => AuthState {
                is_initialized: true,
                is_authenticated: true,
                is_two_factor_enabled: true,
                ..AuthState::default()
            },
            AuthPhase::Authenticated => AuthState {
                is_initialized: true,
                is_authenticated: true,
                ..AuthState::default()
            },
        }
    }
}

pub struct AuthMachine {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    config: AuthConfig,
    phase: AuthPhase,
}

impl AuthMachine {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>, config: AuthConfig) -> Self {
        Self {
            store,
            clock,
            config,
            phase: AuthPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn state(&self) -> AuthState {
        self.phase.into()
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// The stored bearer token, if a login has succeeded.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.store.get(keys::AUTH_TOKEN)?)
    }

    /// Rebuilds the phase from the store. After this the machine never
    /// returns to `Uninitialized`.
    pub fn restore(&mut self) -> Result<AuthPhase> {
        if self.store.get(keys::IS_INITIALIZED)?.as_deref() != Some("true") {
            self.store.set(keys::IS_INITIALIZED, "true")?;
        }

        let has_token = self.store.get(keys::AUTH_TOKEN)?.is_some();
        let requires_password_change = self.flag(keys::REQUIRES_PASSWORD_CHANGE)?;
        let two_factor_pending = self.config.two_factor && self.flag(keys::TWO_FACTOR_PENDING)?;

        self.phase = if !has_token {
            AuthPhase::Unauthenticated {
                requires_password_change,
            }
        } else if requires_password_change {
            AuthPhase::ForcedPasswordChange
        } else if two_factor_pending {
            AuthPhase::TwoFactorPending
        } else {
            AuthPhase::Authenticated
        };
        Ok(self.phase)
    }

    /// Checks `password` against the stored password, or the bootstrap
    /// password when none has been set yet.
    pub fn login(&mut self, password: &str) -> Result<bool> {
        self.ensure_initialized()?;

        let stored = self.store.get(keys::ADMIN_PASSWORD)?;
        let first_login = stored.is_none();
        let expected = stored
            .as_deref()
            .unwrap_or(self.config.bootstrap_password.as_str());
        if password != expected {
            warn!("login rejected");
            return Ok(false);
        }

        let token = new_session_token()?;

        // The token goes last: without it a reload is always logged out.
        let (next, mut writes) = if first_login {
            (
                AuthPhase::ForcedPasswordChange,
                vec![(keys::REQUIRES_PASSWORD_CHANGE, Some("true"))],
            )
        } else if self.config.two_factor {
            (
                AuthPhase::TwoFactorPending,
                vec![(keys::TWO_FACTOR_PENDING, Some("true"))],
            )
        } else {
            (AuthPhase::Authenticated, Vec::new())
        };
        writes.push((keys::AUTH_TOKEN, Some(token.as_str())));
        self.apply(&writes)?;
        self.phase = next;

        info!("login accepted (first_login={first_login})");
        Ok(true)
    }

    /// Replaces the password. Allowed once logged in, including the forced
    /// change after a bootstrap login.
    pub fn change_password(&mut self, new_password: &str) -> Result<()> {
        self.ensure_initialized()?;

        if !matches!(
            self.phase,
            AuthPhase::ForcedPasswordChange | AuthPhase::Authenticated
        ) {
            return Err(AppError::Unauthorized("login required".into()));
        }
        if new_password.chars().count() < self.config.min_password_len {
            return Err(AppError::ValidationError(format!(
                "password must be at least {} characters",
                self.config.min_password_len
            )));
        }

        self.apply(&[
            (keys::ADMIN_PASSWORD, Some(new_password)),
            (keys::REQUIRES_PASSWORD_CHANGE, Some("false")),
        ])?;
        self.phase = AuthPhase::Authenticated;

        info!("admin password changed");
        Ok(())
    }

    /// Issues a new code for the pending challenge, replacing any earlier one.
    pub fn generate_two_factor_code(&mut self) -> Result<OneTimeCode> {
        self.ensure_initialized()?;

        if self.phase != AuthPhase::TwoFactorPending {
            return Err(AppError::Unauthorized(
                "no two-factor challenge is pending".into(),
            ));
        }

        let code = OneTimeCode::issue(self.clock.now(), self.config.code_ttl)?;
        self.store
            .set(keys::TWO_FACTOR_CODE, &serde_json::to_string(&code)?)?;
        Ok(code)
    }

    /// Consumes the outstanding code if `submitted` matches it before expiry.
    /// An expired code is discarded by the check.
    pub fn verify_two_factor(&mut self, submitted: &str) -> Result<bool> {
        self.ensure_initialized()?;

        if self.phase != AuthPhase::TwoFactorPending {
            return Ok(false);
        }
        let Some(raw) = self.store.get(keys::TWO_FACTOR_CODE)? else {
            return Ok(false);
        };
        let outstanding: OneTimeCode = match serde_json::from_str(&raw) {
            Ok(code) => code,
            Err(_) => {
                warn!("discarding unreadable one-time code");
                self.store.remove(keys::TWO_FACTOR_CODE)?;
                return Ok(false);
            }
        };

        if outstanding.is_expired(self.clock.now()) {
            self.store.remove(keys::TWO_FACTOR_CODE)?;
            warn!("one-time code expired");
            return Ok(false);
        }
        if !outstanding.matches(submitted) {
            warn!("one-time code mismatch");
            return Ok(false);
        }

        self.apply(&[(keys::TWO_FACTOR_CODE, None), (keys::TWO_FACTOR_PENDING, None)])?;
        self.phase = AuthPhase::Authenticated;

        info!("two-factor verification succeeded");
        Ok(true)
    }

    /// Drops the token and any pending code. A pending forced password change
    /// is kept.
    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::TWO_FACTOR_CODE)?;
        self.store.remove(keys::TWO_FACTOR_PENDING)?;

        self.phase = AuthPhase::Unauthenticated {
            requires_password_change: self.flag(keys::REQUIRES_PASSWORD_CHANGE)?,
        };
        info!("logged out");
        Ok(())
    }

    fn ensure_initialized(&mut self) -> Result<()> {
        if self.phase == AuthPhase::Uninitialized {
            self.restore()?;
        }
        Ok(())
    }

    /// Applies `writes` in order (`None` removes the key). When one fails,
    /// the keys already touched get their previous values back, so the store
    /// holds either the whole transition or none of it.
    fn apply(&self, writes: &[(&str, Option<&str>)]) -> Result<()> {
        let mut undo: Vec<(&str, Option<String>)> = Vec::with_capacity(writes.len());

        for &(key, value) in writes {
            let step = self.store.get(key).and_then(|previous| {
                match value {
                    Some(value) => self.store.set(key, value)?,
                    None => self.store.remove(key)?,
                }
                Ok(previous)
            });

            match step {
                Ok(previous) => undo.push((key, previous)),
                Err(err) => {
                    self.roll_back(&undo);
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    fn roll_back(&self, undo: &[(&str, Option<String>)]) {
        for (key, previous) in undo.iter().rev() {
            let restored = match previous {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(err) = restored {
                warn!("could not restore {key} after a failed write: {err}");
            }
        }
    }

    fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.store.get(key)?.as_deref() == Some("true"))
    }
}

/// Opaque random token, 32 hex characters.
fn new_session_token() -> Result<String> {
    let mut buf = [0u8; 16];
    getrandom::getrandom(&mut buf)
        .map_err(|e| AppError::Internal(format!("random source unavailable: {e}")))?;
    Ok(hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::traits::{ManualClock, MockSessionStore};
    use chrono::Utc;

    struct Harness {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        machine: AuthMachine,
    }

    fn harness(two_factor: bool) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = AuthConfig {
            two_factor,
            ..AuthConfig::default()
        };
        let machine = AuthMachine::new(store.clone(), clock.clone(), config);
        Harness {
            store,
            clock,
            machine,
        }
    }

    /// Bootstrap login plus forced change, then logout: a returning user.
    fn returning_user(two_factor: bool) -> Harness {
        let mut h = harness(two_factor);
        assert!(h.machine.login(DEFAULT_BOOTSTRAP_PASSWORD).unwrap());
        h.machine.change_password("s3cret-pass").unwrap();
        h.machine.logout().unwrap();
        h
    }

    #[test]
    fn restore_marks_session_initialized() {
        let mut h = harness(true);
        assert_eq!(h.machine.phase(), AuthPhase::Uninitialized);
        assert_eq!(h.machine.phase().screen(), Screen::Loading);

        let phase = h.machine.restore().unwrap();
        assert_eq!(
            phase,
            AuthPhase::Unauthenticated {
                requires_password_change: false
            }
        );
        assert!(h.machine.state().is_initialized);
        assert_eq!(
            h.store.get(keys::IS_INITIALIZED).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn bootstrap_login_forces_password_change() {
        let mut h = harness(true);
        assert!(h.machine.login(DEFAULT_BOOTSTRAP_PASSWORD).unwrap());
        assert_eq!(h.machine.phase(), AuthPhase::ForcedPasswordChange);
        assert!(h.machine.token().unwrap().is_some());

        let state = h.machine.state();
        assert!(state.is_authenticated && state.requires_password_change);
        assert!(!state.is_two_factor_enabled);
    }

    #[test]
    fn wrong_password_leaves_state_unchanged() {
        let mut h = harness(true);
        h.machine.restore().unwrap();
        let before = h.machine.phase();

        assert!(!h.machine.login("nope").unwrap());
        assert_eq!(h.machine.phase(), before);
        assert_eq!(h.machine.token().unwrap(), None);
    }

    #[test]
    fn short_password_is_rejected() {
        let mut h = harness(true);
        h.machine.login(DEFAULT_BOOTSTRAP_PASSWORD).unwrap();
        let err = h.machine.change_password("short").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(h.machine.phase(), AuthPhase::ForcedPasswordChange);
    }

    #[test]
    fn password_change_requires_login() {
        let mut h = harness(true);
        let err = h.machine.change_password("long-enough").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn changed_password_replaces_bootstrap() {
        let mut h = returning_user(false);

        assert!(!h.machine.login(DEFAULT_BOOTSTRAP_PASSWORD).unwrap());
        assert!(h.machine.login("s3cret-pass").unwrap());
        assert_eq!(h.machine.phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn logout_preserves_pending_password_change() {
        let mut h = harness(true);
        h.machine.login(DEFAULT_BOOTSTRAP_PASSWORD).unwrap();
        h.machine.logout().unwrap();

        assert_eq!(
            h.machine.phase(),
            AuthPhase::Unauthenticated {
                requires_password_change: true
            }
        );
        assert_eq!(h.machine.token().unwrap(), None);

        // Still no stored password, so the bootstrap path applies again.
        assert!(h.machine.login(DEFAULT_BOOTSTRAP_PASSWORD).unwrap());
        assert_eq!(h.machine.phase(), AuthPhase::ForcedPasswordChange);
    }

    #[test]
    fn returning_login_requires_one_time_code() {
        let mut h = returning_user(true);
        assert!(h.machine.login("s3cret-pass").unwrap());
        assert_eq!(h.machine.phase(), AuthPhase::TwoFactorPending);
        assert_eq!(h.machine.phase().screen(), Screen::TwoFactor);

        let otp = h.machine.generate_two_factor_code().unwrap();
        assert!(h.machine.verify_two_factor(&otp.code).unwrap());
        assert_eq!(h.machine.phase(), AuthPhase::Authenticated);
        assert_eq!(h.store.get(keys::TWO_FACTOR_CODE).unwrap(), None);
    }

    #[test]
    fn code_is_single_use() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();
        let otp = h.machine.generate_two_factor_code().unwrap();

        assert!(h.machine.verify_two_factor(&otp.code).unwrap());
        assert!(!h.machine.verify_two_factor(&otp.code).unwrap());
    }

    #[test]
    fn expired_code_is_discarded() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();
        let otp = h.machine.generate_two_factor_code().unwrap();

        h.clock.advance(Duration::seconds(CODE_TTL_SECS + 1));
        assert!(!h.machine.verify_two_factor(&otp.code).unwrap());
        assert_eq!(h.store.get(keys::TWO_FACTOR_CODE).unwrap(), None);
        assert_eq!(h.machine.phase(), AuthPhase::TwoFactorPending);

        // Nothing left to match against.
        assert!(!h.machine.verify_two_factor(&otp.code).unwrap());
    }

    #[test]
    fn code_is_valid_up_to_expiry() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();
        let otp = h.machine.generate_two_factor_code().unwrap();

        h.clock.advance(Duration::seconds(CODE_TTL_SECS));
        assert!(h.machine.verify_two_factor(&otp.code).unwrap());
    }

    #[test]
    fn wrong_code_keeps_outstanding_code() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();
        let otp = h.machine.generate_two_factor_code().unwrap();
        let wrong = if otp.code == "000000" { "111111" } else { "000000" };

        assert!(!h.machine.verify_two_factor(wrong).unwrap());
        assert!(h.store.get(keys::TWO_FACTOR_CODE).unwrap().is_some());
        assert!(h.machine.verify_two_factor(&otp.code).unwrap());
    }

    #[test]
    fn regenerating_supersedes_previous_code() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();
        let first = h.machine.generate_two_factor_code().unwrap();
        let second = h.machine.generate_two_factor_code().unwrap();

        if first.code != second.code {
            assert!(!h.machine.verify_two_factor(&first.code).unwrap());
        }
        assert!(h.machine.verify_two_factor(&second.code).unwrap());
    }

    #[test]
    fn verify_without_code_fails() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();
        assert!(!h.machine.verify_two_factor("123456").unwrap());
    }

    #[test]
    fn code_generation_needs_pending_challenge() {
        let mut h = harness(true);
        assert!(matches!(
            h.machine.generate_two_factor_code(),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn logout_discards_code_and_challenge() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();
        h.machine.generate_two_factor_code().unwrap();
        h.machine.logout().unwrap();

        assert_eq!(h.store.get(keys::TWO_FACTOR_CODE).unwrap(), None);
        assert_eq!(h.store.get(keys::TWO_FACTOR_PENDING).unwrap(), None);
        assert_eq!(h.machine.phase().screen(), Screen::Login);
    }

    #[test]
    fn reload_during_challenge_restores_challenge() {
        let mut h = returning_user(true);
        h.machine.login("s3cret-pass").unwrap();

        let mut reloaded = AuthMachine::new(
            h.store.clone(),
            h.clock.clone(),
            h.machine.config().clone(),
        );
        assert_eq!(reloaded.restore().unwrap(), AuthPhase::TwoFactorPending);
    }

    #[test]
    fn reload_after_bootstrap_login_restores_forced_change() {
        let mut h = harness(true);
        h.machine.login(DEFAULT_BOOTSTRAP_PASSWORD).unwrap();

        let mut reloaded = AuthMachine::new(
            h.store.clone(),
            h.clock.clone(),
            h.machine.config().clone(),
        );
        assert_eq!(reloaded.restore().unwrap(), AuthPhase::ForcedPasswordChange);
    }

    #[test]
    fn storage_failure_surfaces_as_internal_error() {
        let mut store = MockSessionStore::new();
        store
            .expect_get()
            .returning(|_| Err(anyhow::anyhow!("disk unavailable")));
        let mut machine = AuthMachine::new(
            Arc::new(store),
            Arc::new(ManualClock::new(Utc::now())),
            AuthConfig::default(),
        );

        assert!(matches!(machine.login("x"), Err(AppError::Internal(_))));
        assert_eq!(machine.phase(), AuthPhase::Uninitialized);
    }

    /// A mock over a real in-memory store whose writes to `failing` error.
    fn store_failing_on(failing: &'static str) -> (Arc<MemoryStore>, MockSessionStore) {
        let inner = Arc::new(MemoryStore::new());
        let mut mock = MockSessionStore::new();

        let reads = inner.clone();
        mock.expect_get().returning(move |key| reads.get(key));
        let writes = inner.clone();
        mock.expect_set().returning(move |key, value| {
            if key == failing {
                Err(anyhow::anyhow!("quota exceeded"))
            } else {
                writes.set(key, value)
            }
        });
        let removes = inner.clone();
        mock.expect_remove().returning(move |key| removes.remove(key));

        (inner, mock)
    }

    fn reload(store: &Arc<MemoryStore>, config: AuthConfig) -> AuthPhase {
        let mut machine = AuthMachine::new(
            store.clone(),
            Arc::new(ManualClock::new(Utc::now())),
            config,
        );
        machine.restore().unwrap()
    }

    #[test]
    fn failed_bootstrap_login_leaves_nothing_behind() {
        for failing in [keys::REQUIRES_PASSWORD_CHANGE, keys::AUTH_TOKEN] {
            let (inner, mock) = store_failing_on(failing);
            let mut machine = AuthMachine::new(
                Arc::new(mock),
                Arc::new(ManualClock::new(Utc::now())),
                AuthConfig::default(),
            );

            assert!(matches!(
                machine.login(DEFAULT_BOOTSTRAP_PASSWORD),
                Err(AppError::Internal(_))
            ));
            assert_eq!(inner.get(keys::AUTH_TOKEN).unwrap(), None, "failing {failing}");
            assert_eq!(inner.get(keys::REQUIRES_PASSWORD_CHANGE).unwrap(), None);
            assert_eq!(
                reload(&inner, AuthConfig::default()),
                AuthPhase::Unauthenticated {
                    requires_password_change: false
                }
            );
        }
    }

    #[test]
    fn failed_returning_login_never_skips_the_code() {
        for failing in [keys::TWO_FACTOR_PENDING, keys::AUTH_TOKEN] {
            let (inner, mock) = store_failing_on(failing);
            inner.set(keys::ADMIN_PASSWORD, "s3cret-pass").unwrap();
            inner.set(keys::REQUIRES_PASSWORD_CHANGE, "false").unwrap();
            let mut machine = AuthMachine::new(
                Arc::new(mock),
                Arc::new(ManualClock::new(Utc::now())),
                AuthConfig::default(),
            );

            assert!(machine.login("s3cret-pass").is_err());
            assert_eq!(inner.get(keys::AUTH_TOKEN).unwrap(), None, "failing {failing}");
            assert_eq!(inner.get(keys::TWO_FACTOR_PENDING).unwrap(), None);
            assert_eq!(
                reload(&inner, AuthConfig::default()),
                AuthPhase::Unauthenticated {
                    requires_password_change: false
                }
            );
        }
    }

    #[test]
    fn failed_password_change_keeps_old_password() {
        let (inner, mock) = store_failing_on(keys::REQUIRES_PASSWORD_CHANGE);
        inner.set(keys::IS_INITIALIZED, "true").unwrap();
        inner.set(keys::AUTH_TOKEN, "token").unwrap();
        inner.set(keys::REQUIRES_PASSWORD_CHANGE, "true").unwrap();
        let mut machine = AuthMachine::new(
            Arc::new(mock),
            Arc::new(ManualClock::new(Utc::now())),
            AuthConfig::default(),
        );
        assert_eq!(machine.restore().unwrap(), AuthPhase::ForcedPasswordChange);

        assert!(matches!(
            machine.change_password("long-enough-pass"),
            Err(AppError::Internal(_))
        ));
        assert_eq!(machine.phase(), AuthPhase::ForcedPasswordChange);
        assert_eq!(inner.get(keys::ADMIN_PASSWORD).unwrap(), None);
        assert_eq!(
            reload(&inner, AuthConfig::default()),
            AuthPhase::ForcedPasswordChange
        );
    }

    #[test]
    fn flag_view_never_combines_change_and_challenge() {
        let phases = [
            AuthPhase::Uninitialized,
            AuthPhase::Unauthenticated {
                requires_password_change: true,
            },
            AuthPhase::ForcedPasswordChange,
            AuthPhase::TwoFactorPending,
            AuthPhase::Authenticated,
        ];
        for phase in phases {
            let state = AuthState::from(phase);
            assert!(!(state.requires_password_change && state.is_two_factor_enabled));
            assert_eq!(state.is_authenticated, phase.is_authenticated());
        }
    }
}
