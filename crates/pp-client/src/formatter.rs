//! `PostFormatter` implementations for the operator client.

use async_trait::async_trait;
use log::{debug, warn};
use pp_core::format::format_request;
use pp_core::traits::{FormatRequest, PostFormatter};
use pp_core::{AppError, Result};
use serde::Deserialize;

/// Formats in-process. The token is not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFormatter;

#[async_trait]
impl PostFormatter for LocalFormatter {
    async fn format(&self, _token: Option<&str>, request: &FormatRequest) -> Result<String> {
        format_request(request)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormatResponse {
    formatted_text: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Calls `POST {base}/api/format` on the backend.
#[derive(Debug, Clone)]
pub struct RemoteFormatter {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteFormatter {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/format", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PostFormatter for RemoteFormatter {
    async fn format(&self, token: Option<&str>, request: &FormatRequest) -> Result<String> {
        let mut call = self.client.post(&self.endpoint).json(request);
        if let Some(token) = token {
            call = call.bearer_auth(token);
        }

        let response = call
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("format request failed: {e}")))?;
        let status = response.status();
        debug!("format endpoint answered {status}");

        if status.is_success() {
            let body: FormatResponse = response
                .json()
                .await
                .map_err(|e| AppError::Internal(format!("unreadable format response: {e}")))?;
            return Ok(body.formatted_text);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        warn!("format request rejected: {status} {message}");

        Err(match status.as_u16() {
            400 => AppError::ValidationError(message),
            401 => AppError::Unauthorized(message),
            403 => AppError::Forbidden(message),
            _ => AppError::Internal(message),
        })
    }
}
