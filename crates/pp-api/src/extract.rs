//! Bearer-token guard for protected routes.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};

use crate::error::ApiError;
use crate::handlers::AppState;

/// Proof that the request carried an acceptable bearer token.
///
/// Missing token → 401, rejected token → 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl FromRequest for AdminSession {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<AdminSession, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::internal("Internal server error", "AppState is not registered"))?;

    let token = bearer_token(req).ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?;

    if !state.auth.verify_token(token) {
        log::warn!("rejected bearer token on {}", req.path());
        return Err(ApiError::Forbidden("Invalid token".into()));
    }
    Ok(AdminSession)
}

/// Token part of `Authorization: Bearer <token>`.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
