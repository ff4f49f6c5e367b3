//! Session-store keys shared by the auth machine and the catalog.

pub const AUTH_TOKEN: &str = "authToken";
pub const ADMIN_PASSWORD: &str = "adminPassword";
/// `"true"` / `"false"`.
pub const REQUIRES_PASSWORD_CHANGE: &str = "requiresPasswordChange";
/// JSON `{code, expiresAt}` with `expiresAt` in epoch milliseconds.
pub const TWO_FACTOR_CODE: &str = "twoFactorCode";
pub const TWO_FACTOR_PENDING: &str = "twoFactorPending";
/// JSON array of books.
pub const BOOKS: &str = "books";
pub const IS_INITIALIZED: &str = "isInitialized";
