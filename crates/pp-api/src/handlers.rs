//! # pp-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use actix_web::{web, HttpResponse};
use log::{info, warn};
use pp_core::auth::MIN_PASSWORD_LEN;
use pp_core::traits::{AdminAuth, FormatRequest};
use pp_core::format::format_request;
use pp_core::{otp, AppError};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AdminSession;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub auth: Box<dyn AdminAuth>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResponse {
    pub formatted_text: String,
}

/// Exchanges the admin password for a bearer token.
pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    if !data.auth.verify_password(&body.password).await {
        warn!("admin login rejected");
        return Err(ApiError::Unauthorized("Invalid password".into()));
    }

    let token = data
        .auth
        .issue_token()
        .map_err(|e| ApiError::internal("Internal server error", e))?;

    info!("admin login accepted");
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Accepts any well-formed six-digit code; the operator client holds the
/// outstanding code and checks the value itself.
pub async fn verify_two_factor(
    _session: AdminSession,
    body: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    if !otp::is_well_formed(body.code.trim()) {
        return Err(ApiError::BadRequest("Invalid code".into()));
    }
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

pub async fn change_password(
    _session: AdminSession,
    data: web::Data<AppState>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_password = body.new_password.as_deref().unwrap_or_default();
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    data.auth
        .change_password(new_password)
        .await
        .map_err(|e| ApiError::internal("Password change failed", e))?;

    info!("admin password changed");
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

/// Renders the submitted books. A `postTitle` selects the extended layout.
pub async fn format(
    _session: AdminSession,
    body: web::Json<FormatRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.books.as_ref().map_or(true, Vec::is_empty) {
        return Err(ApiError::BadRequest("Books data is required".into()));
    }
    if request
        .post_title
        .as_deref()
        .is_some_and(|title| title.trim().is_empty())
    {
        return Err(ApiError::BadRequest("Post title is required".into()));
    }

    let formatted_text = format_request(&request).map_err(|err| match err {
        AppError::ValidationError(msg) => ApiError::BadRequest(msg),
        other => ApiError::internal("Formatting failed", other),
    })?;

    Ok(HttpResponse::Ok().json(FormatResponse { formatted_text }))
}
