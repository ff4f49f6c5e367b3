//! # pp-client
//!
//! Operator-side pieces: the session that ties the auth flow, the catalog and
//! a formatter together, the one-time-code countdown, and the formatters
//! (in-process or through the backend).

pub mod countdown;
pub mod formatter;
pub mod session;

pub use countdown::CodeCountdown;
pub use formatter::{LocalFormatter, RemoteFormatter};
pub use session::OperatorSession;
