//! # pp-api
//!
//! The web routing layer for Price-Post: login, password change, the
//! one-time-code check and post formatting, all JSON over `/api`.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use actix_web::web;
use pp_core::AppError;

pub use error::ApiError;
pub use extract::AdminSession;
pub use handlers::AppState;

/// Largest accepted JSON body.
const JSON_LIMIT: usize = 1 << 20;

/// Configures the API routes.
///
/// The binary mounts this at the root; everything lives under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .route("/login", web::post().to(handlers::login))
            .route("/verify-2fa", web::post().to(handlers::verify_two_factor))
            .route("/change-password", web::post().to(handlers::change_password))
            .route("/format", web::post().to(handlers::format)),
    );
}

/// Malformed bodies come back in the same `{error}` envelope as other 400s.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            ApiError::from(AppError::ValidationError(err.to_string())).into()
        })
}
