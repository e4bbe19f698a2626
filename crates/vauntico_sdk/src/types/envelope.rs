//! Response envelopes shared by every endpoint.
//!
//! Success bodies are decoded strictly. Error bodies are decoded leniently so
//! that a partial envelope still yields the server's message and code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata attached to successful responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// API version.
    pub version: String,
    /// Server time of the response.
    pub timestamp: DateTime<Utc>,
    /// Server-side request id.
    pub request_id: String,
    /// Server processing time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// `{success: true, data, metadata?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Endpoint payload.
    pub data: T,
    /// Response metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

/// Metadata attached to error responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMetadata {
    /// API version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Server time of the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Id linking the failure to server-side logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Endpoint that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// `{success: false, error, code?, details?, metadata?}`.
///
/// Only `error` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `false`.
    #[serde(default)]
    pub success: bool,
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Extra structured context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Error metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ErrorMetadata>,
}

impl ErrorEnvelope {
    /// Correlation id from the metadata block.
    pub fn correlation_id(&self) -> Option<&str> {
        self.metadata.as_ref()?.correlation_id.as_deref()
    }
}

/// Quota fields of a 429 body, as sent by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitQuota {
    /// Seconds to wait before retrying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<f64>,
    /// Request quota for the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    /// Requests left in the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
    /// Unix timestamp of the window reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<f64>,
}

/// Error envelope of a 429 response, extended with quota fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitEnvelope {
    /// The common error fields.
    #[serde(flatten)]
    pub envelope: ErrorEnvelope,
    /// Quota fields.
    #[serde(flatten)]
    pub quota: RateLimitQuota,
}
