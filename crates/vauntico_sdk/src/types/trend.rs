//! Trust score history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bucket of score history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    /// Bucket date as sent by the server.
    pub date: String,
    /// User score.
    pub score: f64,
    /// Platform benchmark.
    pub benchmark: f64,
}

/// Summary of a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetadata {
    /// API version.
    pub version: String,
    /// Endpoint that produced the series.
    pub endpoint: String,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
    /// Number of points.
    pub count: u32,
    /// Mean score over the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    /// Highest score in the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_score: Option<f64>,
    /// Lowest score in the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_score: Option<f64>,
}

/// Response of `GET /dashboard/trend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResponse {
    /// Data points, oldest first.
    pub data: Vec<TrendDataPoint>,
    /// Timeframe the series covers.
    pub timeframe: String,
    /// Series summary.
    pub metadata: TrendMetadata,
}
