//! Error types for the budgeting API client.
//!
//! # Design
//! `ApiError` is the single base failure type. Each variant is one failure
//! category: the kinds the upstream API reports in its error envelope, a
//! transport-level `Connection` failure, and the library-side kinds raised
//! before a request is sent or after a response fails to decode. Callers
//! match narrowly on a variant or propagate the whole enum with `?`.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Why the API refused access to an otherwise valid account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountIssue {
    SubscriptionLapsed,
    TrialExpired,
}

impl fmt::Display for AccountIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountIssue::SubscriptionLapsed => write!(f, "subscription lapsed"),
            AccountIssue::TrialExpired => write!(f, "trial expired"),
        }
    }
}

/// What could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundScope {
    /// The server does not know the requested URI.
    Uri,
    /// The URI is valid but the resource it names does not exist.
    Resource,
    /// A lookup into an already fetched collection found no match.
    Lookup { entity: &'static str, key: String },
}

impl fmt::Display for NotFoundScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundScope::Uri => write!(f, "URI not found"),
            NotFoundScope::Resource => write!(f, "requested resource not found"),
            NotFoundScope::Lookup { entity, key } => write!(f, "no {entity} with key '{key}'"),
        }
    }
}

/// Errors returned by the client, the response factory and budget lookups.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API rejected the request as malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing, empty or rejected access token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// API access requires an active subscription or trial.
    #[error("account inactive ({reason}): {detail}")]
    Account { reason: AccountIssue, detail: String },

    #[error("{scope}")]
    NotFound { scope: NotFoundScope },

    /// A POST conflicted with an existing resource.
    #[error("conflict with existing resource: {0}")]
    Conflict(String),

    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The upstream service failed; retrying later may succeed.
    #[error("internal server error: {0}")]
    InternalServerError(String),

    /// No HTTP response was received (DNS, TCP, I/O or timeout failure).
    #[error("connection failed: {0}")]
    Connection(String),

    /// An error the API reported that has no dedicated kind.
    #[error("unexpected API error '{name}': {detail}")]
    Unexpected { name: String, detail: String },

    /// The body decoded but matched none of the known envelope shapes.
    #[error("unrecognized response shape: {0}")]
    UnrecognizedResponse(String),

    /// A value was constructed without one of its mandatory fields.
    #[error("invalid value: missing or empty '{field}'")]
    Validation { field: &'static str },

    /// The call was rejected locally before any request was built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Map the `name` of an API error envelope to its error kind.
    pub fn from_error_name(name: &str, detail: &str) -> Self {
        let detail = detail.to_string();
        match name {
            "bad_request" => ApiError::BadRequest(detail),
            "not_authorized" | "unauthorized" => ApiError::Authentication(detail),
            "subscription_lapsed" => ApiError::Account {
                reason: AccountIssue::SubscriptionLapsed,
                detail,
            },
            "trial_expired" => ApiError::Account {
                reason: AccountIssue::TrialExpired,
                detail,
            },
            "not_found" => ApiError::NotFound {
                scope: NotFoundScope::Uri,
            },
            "resource_not_found" => ApiError::NotFound {
                scope: NotFoundScope::Resource,
            },
            "conflict" => ApiError::Conflict(detail),
            "too_many_requests" => ApiError::RateLimitExceeded(detail),
            "internal_server_error" => ApiError::InternalServerError(detail),
            other => ApiError::Unexpected {
                name: other.to_string(),
                detail,
            },
        }
    }

    /// Classify a non-2xx response whose body is not an error envelope.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = format!("HTTP {status}: {body}");
        match status {
            400 => ApiError::BadRequest(detail),
            401 | 403 => ApiError::Authentication(detail),
            404 => ApiError::NotFound {
                scope: NotFoundScope::Uri,
            },
            409 => ApiError::Conflict(detail),
            429 => ApiError::RateLimitExceeded(detail),
            500..=599 => ApiError::InternalServerError(detail),
            _ => ApiError::Unexpected {
                name: status.to_string(),
                detail,
            },
        }
    }

    pub(crate) fn lookup(entity: &'static str, key: impl Into<String>) -> Self {
        ApiError::NotFound {
            scope: NotFoundScope::Lookup {
                entity,
                key: key.into(),
            },
        }
    }

    /// True for both URI-level and resource-level not-found errors and for
    /// failed lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_name_maps_to_its_kind() {
        let cases: &[(&str, fn(&ApiError) -> bool)] = &[
            ("bad_request", |e| matches!(e, ApiError::BadRequest(_))),
            ("not_authorized", |e| matches!(e, ApiError::Authentication(_))),
            ("unauthorized", |e| matches!(e, ApiError::Authentication(_))),
            ("subscription_lapsed", |e| {
                matches!(e, ApiError::Account { reason: AccountIssue::SubscriptionLapsed, .. })
            }),
            ("trial_expired", |e| {
                matches!(e, ApiError::Account { reason: AccountIssue::TrialExpired, .. })
            }),
            ("not_found", |e| matches!(e, ApiError::NotFound { scope: NotFoundScope::Uri })),
            ("resource_not_found", |e| {
                matches!(e, ApiError::NotFound { scope: NotFoundScope::Resource })
            }),
            ("conflict", |e| matches!(e, ApiError::Conflict(_))),
            ("too_many_requests", |e| matches!(e, ApiError::RateLimitExceeded(_))),
            ("internal_server_error", |e| matches!(e, ApiError::InternalServerError(_))),
        ];
        for (name, check) in cases {
            let err = ApiError::from_error_name(name, "detail");
            assert!(check(&err), "{name} mapped to {err:?}");
        }
    }

    #[test]
    fn unknown_name_is_unexpected() {
        let err = ApiError::from_error_name("teapot", "short and stout");
        match err {
            ApiError::Unexpected { name, detail } => {
                assert_eq!(name, "teapot");
                assert_eq!(detail, "short and stout");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }

    #[test]
    fn status_fallback() {
        assert!(matches!(ApiError::from_status(401, ""), ApiError::Authentication(_)));
        assert!(matches!(ApiError::from_status(429, ""), ApiError::RateLimitExceeded(_)));
        assert!(matches!(ApiError::from_status(503, ""), ApiError::InternalServerError(_)));
        assert!(ApiError::from_status(404, "").is_not_found());
        assert!(matches!(ApiError::from_status(418, ""), ApiError::Unexpected { .. }));
    }

    #[test]
    fn lookup_error_names_entity_and_key() {
        let err = ApiError::lookup("account", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no account with key 'abc'");
    }
}
