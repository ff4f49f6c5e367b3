//! price-post/crates/pp-core/src/lib.rs
//!
//! Domain logic and interface definitions for Price-Post: the book model, the
//! post formatter, the operator auth flow and the ports plugins implement.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod format;
pub mod keys;
pub mod models;
pub mod otp;
pub mod store;
pub mod traits;

// Re-exporting for easier access in other crates
pub use auth::{AuthConfig, AuthMachine, AuthPhase, AuthState, Screen};
pub use catalog::Catalog;
pub use error::*;
pub use models::*;
pub use otp::OneTimeCode;
pub use store::MemoryStore;
pub use traits::*;
