//! Authenticated transport capability shared by the client and budgets.
//!
//! # Design
//! A `Session` owns the base URL, the bearer token and an `Arc<dyn Transport>`.
//! It is an explicit value: each client builds its own, and a `Budget` keeps a
//! clone so it can issue mutating calls scoped to itself. Two clients never
//! share state unless they share a transport on purpose.

use std::fmt;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

#[derive(Clone)]
pub struct Session {
    base_url: String,
    token: String,
    transport: Arc<dyn Transport>,
}

impl Session {
    /// Fails with `ApiError::Authentication` when the token is empty, before
    /// the transport is ever used.
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let token = config.access_token.trim();
        if token.is_empty() {
            return Err(ApiError::Authentication("no access token provided".to_string()));
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (relative to the base URL) with the bearer
    /// token attached. A body also sets the JSON content type.
    pub fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("authorization".to_string(), format!("Bearer {}", self.token))];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            headers,
            body,
        }
    }

    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.transport.execute(request)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}
