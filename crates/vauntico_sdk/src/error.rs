//! Error taxonomy for Vauntico API operations.
//!
//! Every failure carries a machine-readable [`code`](Error::code), the raw
//! payload that produced it and, when the server supplied one, a correlation
//! id for tracing the request through server-side logs.

use crate::types::{ErrorEnvelope, RateLimitEnvelope, RateLimitQuota};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Header carrying the server's correlation id when the body has none.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Stable error code strings.
pub mod code {
    /// The transport failed (connect, DNS, timeout, broken body).
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    /// Protocol-level failure or an unclassified error status.
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
    /// The server answered 429.
    pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
    /// Unexpected failure while handling the request.
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
    /// Error envelope without a `code` field.
    pub const API_ERROR: &str = "API_ERROR";
    /// Success envelope whose payload does not match the expected record.
    pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";
    /// Invalid base URL or header.
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    /// The client has been closed.
    pub const CLIENT_CLOSED: &str = "CLIENT_CLOSED";
}

/// Quota metadata attached to a rate-limit rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Message from the error envelope.
    pub message: String,
    /// Seconds to wait before retrying, rounded up.
    ///
    /// Quota fields that are negative or not numbers are `None`.
    pub retry_after: Option<u64>,
    /// Request quota for the current window.
    pub limit: Option<u64>,
    /// Requests left in the current window.
    pub remaining: Option<u64>,
    /// Unix timestamp at which the window resets.
    pub reset: Option<u64>,
    /// Correlation id, if the server sent one.
    pub correlation_id: Option<String>,
    /// Raw error payload.
    pub response: Value,
}

/// Errors that can occur during Vauntico API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response.
    #[error("{message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// Protocol-level failure, or an error status without a structured body.
    #[error("{message}")]
    Http {
        /// Description of the failure.
        message: String,
        /// Response status; `None` when no complete response was received.
        status: Option<u16>,
        /// Correlation id from the `x-correlation-id` header.
        correlation_id: Option<String>,
    },

    /// The server rejected the request with 429.
    #[error("{}", .0.message)]
    RateLimited(Box<RateLimitInfo>),

    /// The server answered with a structured error envelope.
    #[error("{message}")]
    Api {
        /// The envelope's `error` message.
        message: String,
        /// Server-declared error code.
        code: Option<String>,
        /// Response status.
        status: u16,
        /// Correlation id from the envelope metadata, else the response header.
        correlation_id: Option<String>,
        /// Raw error envelope.
        response: Value,
    },

    /// A success payload did not match the expected record shape.
    #[error("invalid response payload: {message}")]
    Decode {
        /// Deserialization failure.
        message: String,
        /// The envelope or `data` value that failed to deserialize.
        response: Value,
    },

    /// Unexpected failure while handling the request. Never retried.
    #[error("{message}")]
    Unknown {
        /// Description of the failure.
        message: String,
    },

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The client was closed.
    #[error("client is closed")]
    Closed,
}

impl Error {
    /// Machine-readable error code.
    ///
    /// Server-declared codes are passed through verbatim.
    pub fn code(&self) -> &str {
        match self {
            Self::Network { .. } => code::NETWORK_ERROR,
            Self::Http { .. } => code::HTTP_ERROR,
            Self::RateLimited(_) => code::RATE_LIMIT_EXCEEDED,
            Self::Api { code, .. } => code.as_deref().unwrap_or(code::API_ERROR),
            Self::Decode { .. } => code::INVALID_RESPONSE,
            Self::Unknown { .. } => code::UNKNOWN_ERROR,
            Self::Config(_) => code::CONFIG_ERROR,
            Self::Closed => code::CLIENT_CLOSED,
        }
    }

    /// Correlation id linking this failure to server-side logs.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::Http { correlation_id, .. } | Self::Api { correlation_id, .. } => {
                correlation_id.as_deref()
            }
            Self::RateLimited(info) => info.correlation_id.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            _ => None,
        }
    }

    /// Raw error payload.
    ///
    /// Errors without a server payload report `{"error": <message>}`.
    pub fn response(&self) -> Value {
        match self {
            Self::Api { response, .. } | Self::Decode { response, .. } => response.clone(),
            Self::RateLimited(info) => info.response.clone(),
            other => json!({ "error": other.to_string() }),
        }
    }

    /// Rate-limit details, when this is a 429 rejection.
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::RateLimited(info) => Some(info),
            _ => None,
        }
    }

    /// Whether the retry loop may attempt the request again.
    ///
    /// Only transport and protocol failures qualify; anything the server
    /// answered with a status is final.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Http { status: None, .. }
        )
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn unknown(message: impl std::fmt::Display) -> Self {
        Self::Unknown {
            message: format!("Unknown error: {message}"),
        }
    }

    /// Classifies a transport error raised by the HTTP client.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        let detail = describe(err);
        if err.is_builder() {
            Self::unknown(detail)
        } else if err.is_redirect() || err.is_status() {
            Self::Http {
                message: format!("HTTP error: {detail}"),
                status: None,
                correlation_id: None,
            }
        } else {
            Self::Network {
                message: format!("Network error: {detail}"),
            }
        }
    }

    /// Classifies an error response (status >= 400).
    ///
    /// The correlation id comes from the envelope metadata, else from the
    /// `x-correlation-id` header.
    pub(crate) fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let payload = serde_json::from_slice::<Value>(body)
            .ok()
            .filter(Value::is_object);
        let header_correlation_id = headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Self::rate_limited(payload, headers, header_correlation_id);
        }

        if let Some(payload) = payload {
            if let Ok(envelope) = ErrorEnvelope::deserialize(&payload) {
                let correlation_id = envelope
                    .correlation_id()
                    .map(str::to_string)
                    .or(header_correlation_id);
                return Self::Api {
                    message: envelope.error,
                    code: envelope.code,
                    status: status.as_u16(),
                    correlation_id,
                    response: payload,
                };
            }

            if let Some(message) = payload.get("message").and_then(Value::as_str) {
                return Self::Http {
                    message: message.to_string(),
                    status: Some(status.as_u16()),
                    correlation_id: header_correlation_id,
                };
            }
        }

        Self::Http {
            message: format!("HTTP {}", status.as_u16()),
            status: Some(status.as_u16()),
            correlation_id: header_correlation_id,
        }
    }

    fn rate_limited(
        payload: Option<Value>,
        headers: &HeaderMap,
        header_correlation_id: Option<String>,
    ) -> Self {
        let payload = payload.unwrap_or_else(|| json!({ "error": "HTTP 429" }));

        let (message, quota, correlation_id) = match RateLimitEnvelope::deserialize(&payload) {
            Ok(RateLimitEnvelope { envelope, quota }) => {
                let correlation_id = envelope.correlation_id().map(str::to_string);
                (envelope.error, quota, correlation_id)
            }
            Err(_) => (
                "HTTP 429".to_string(),
                RateLimitQuota::deserialize(&payload).unwrap_or_default(),
                None,
            ),
        };

        let retry_after = quota
            .retry_after
            .and_then(|secs| whole(secs, f64::ceil))
            .or_else(|| {
                headers
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse().ok())
            });

        Self::RateLimited(Box::new(RateLimitInfo {
            message,
            retry_after,
            limit: quota.limit.and_then(|v| whole(v, f64::round)),
            remaining: quota.remaining.and_then(|v| whole(v, f64::round)),
            reset: quota.reset.and_then(|v| whole(v, f64::round)),
            correlation_id: correlation_id.or(header_correlation_id),
            response: payload,
        }))
    }
}

/// Converts a wire number to a whole count. Negative and non-finite values
/// are dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64, round: fn(f64) -> f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| round(value) as u64)
}

/// Renders an error together with its source chain.
fn describe(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Result type alias for Vauntico API operations.
pub type Result<T> = std::result::Result<T, Error>;
