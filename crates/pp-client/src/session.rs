//! # Operator Session
//!
//! What the operator UI drives: the auth flow, the book catalog and a
//! formatter behind one handle. Entering the one-time-code step issues a
//! code and starts its countdown; leaving that step drops both.

use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use pp_core::traits::{Clock, FormatRequest, PostFormatter, SessionStore, SystemClock};
use pp_core::{
    AppError, AuthConfig, AuthMachine, AuthPhase, AuthState, Book, BookDraft, Catalog,
    OneTimeCode, Result, Screen,
};

use pp_store_file::FileSessionStore;

use crate::countdown::CodeCountdown;

pub struct OperatorSession {
    auth: AuthMachine,
    catalog: Catalog,
    formatter: Box<dyn PostFormatter>,
    challenge: Option<Challenge>,
}

/// The code on display and its countdown.
struct Challenge {
    code: OneTimeCode,
    countdown: CodeCountdown,
}

impl OperatorSession {
    /// Restores auth state and the book list from `store`. Must run inside a
    /// Tokio runtime, since a restored pending challenge starts a countdown.
    pub fn open(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
        formatter: Box<dyn PostFormatter>,
    ) -> Result<Self> {
        let mut auth = AuthMachine::new(Arc::clone(&store), clock, config);
        auth.restore()?;
        let catalog = Catalog::load(store)?;

        let mut session = Self {
            auth,
            catalog,
            formatter,
            challenge: None,
        };
        session.sync_challenge()?;
        Ok(session)
    }

    /// The usual operator setup: state kept in a JSON file at `path`, wall
    /// clock time and the default auth settings.
    pub fn open_file(path: impl Into<PathBuf>, formatter: Box<dyn PostFormatter>) -> Result<Self> {
        let store = FileSessionStore::new(path);
        info!("operator session stored at {}", store.path().display());
        Self::open(
            Arc::new(store),
            Arc::new(SystemClock),
            AuthConfig::default(),
            formatter,
        )
    }

    pub fn phase(&self) -> AuthPhase {
        self.auth.phase()
    }

    pub fn screen(&self) -> Screen {
        self.auth.phase().screen()
    }

    pub fn state(&self) -> AuthState {
        self.auth.state()
    }

    pub fn login(&mut self, password: &str) -> Result<bool> {
        let accepted = self.auth.login(password)?;
        if accepted {
            self.sync_challenge()?;
        }
        Ok(accepted)
    }

    pub fn change_password(&mut self, new_password: &str) -> Result<()> {
        self.auth.change_password(new_password)?;
        self.sync_challenge()
    }

    /// The outstanding code, shown on the two-factor screen.
    pub fn pending_code(&self) -> Option<&OneTimeCode> {
        self.challenge.as_ref().map(|c| &c.code)
    }

    pub fn countdown(&self) -> Option<&CodeCountdown> {
        self.challenge.as_ref().map(|c| &c.countdown)
    }

    /// A new code is offered once the countdown reaches zero.
    pub fn can_regenerate(&self) -> bool {
        self.countdown().is_some_and(CodeCountdown::is_expired)
    }

    /// Replaces the outstanding code and restarts the countdown.
    pub fn regenerate_code(&mut self) -> Result<&OneTimeCode> {
        self.issue_challenge()
    }

    pub fn verify_code(&mut self, submitted: &str) -> Result<bool> {
        let verified = self.auth.verify_two_factor(submitted)?;
        self.sync_challenge()?;
        Ok(verified)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.auth.logout()?;
        self.sync_challenge()
    }

    pub fn books(&self) -> &[Book] {
        self.catalog.books()
    }

    pub fn add_book(&mut self, draft: BookDraft) -> Result<()> {
        self.catalog.add_draft(draft)
    }

    pub fn remove_book(&mut self, index: usize) -> Result<Book> {
        self.catalog.remove(index)
    }

    pub fn clear_books(&mut self) -> Result<()> {
        self.catalog.clear()
    }

    /// Formats the current book list. A `post_title` selects the extended
    /// layout.
    pub async fn generate(
        &self,
        post_title: Option<String>,
        target_audience: Option<String>,
    ) -> Result<String> {
        if self.auth.phase() != AuthPhase::Authenticated {
            return Err(AppError::Unauthorized("login required".into()));
        }
        if self.catalog.is_empty() {
            return Err(AppError::ValidationError("add at least one book".into()));
        }

        let token = self.auth.token()?;
        let request = FormatRequest {
            books: Some(self.catalog.books().to_vec()),
            post_title,
            target_audience,
        };
        self.formatter.format(token.as_deref(), &request).await
    }

    fn sync_challenge(&mut self) -> Result<()> {
        if self.auth.phase() != AuthPhase::TwoFactorPending {
            self.challenge = None;
        } else if self.challenge.is_none() {
            self.issue_challenge()?;
        }
        Ok(())
    }

    fn issue_challenge(&mut self) -> Result<&OneTimeCode> {
        let code = self.auth.generate_two_factor_code()?;
        let seconds = u32::try_from(self.auth.config().code_ttl.num_seconds()).unwrap_or(0);
        info!("one-time code issued, valid for {seconds}s");

        let challenge = self.challenge.insert(Challenge {
            code,
            countdown: CodeCountdown::start(seconds),
        });
        Ok(&challenge.code)
    }
}
