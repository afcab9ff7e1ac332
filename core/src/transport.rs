//! `Transport` backed by a blocking `ureq` agent.

use std::time::Duration;

use log::debug;

use crate::config::{ClientConfig, DEFAULT_MAX_BODY_BYTES};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Executes requests with a shared `ureq::Agent`.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses are returned as data and the response factory can read the
/// API's error envelope.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    max_body_bytes: u64,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self {
            agent,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.timeout).with_max_body_bytes(config.max_body_bytes)
    }

    /// Responses with a larger body fail with `ApiError::Deserialization`.
    pub fn with_max_body_bytes(mut self, max_body_bytes: u64) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!("{} {}", request.method.as_str(), request.path);

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(connection_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_string()
            .map_err(body_error)?;
        debug!("{} {} -> {status}", request.method.as_str(), request.path);

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// An over-limit body maps to `Deserialization`; everything else is a
/// connection error.
fn body_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::BodyExceedsLimit(limit) => {
            ApiError::Deserialization(format!("response body exceeds {limit} bytes"))
        }
        other => connection_error(other),
    }
}

/// Re-signal any ureq failure as a connection error so the transport's own
/// error type never reaches the caller.
fn connection_error(err: ureq::Error) -> ApiError {
    let detail = match &err {
        ureq::Error::HostNotFound => "host not found".to_string(),
        ureq::Error::ConnectionFailed => "connection refused or unreachable".to_string(),
        ureq::Error::Timeout(_) => format!("timed out: {err}"),
        ureq::Error::Io(io) => format!("I/O error: {io}"),
        _ => err.to_string(),
    };
    ApiError::Connection(detail)
}
