//! Trust score records.

use super::{SubscriptionTier, TrendDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// A component of the trust score.
    pub enum ScoreFactor {
        /// Activity and interaction.
        Engagement => "engagement",
        /// Regularity over time.
        Consistency => "consistency",
        /// Quality of contributions.
        Quality => "quality",
        /// Standing in the community.
        Community => "community",
    }
}

wire_enum! {
    /// State of a calculation job.
    pub enum CalculationStatus {
        /// Still running.
        Processing => "processing",
        /// Finished; a fresh score is available.
        Completed => "completed",
        /// Gave up.
        Failed => "failed",
    }
}

/// Per-factor breakdown of a trust score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustScoreFactors {
    /// Engagement factor.
    pub engagement: f64,
    /// Consistency factor.
    pub consistency: f64,
    /// Quality factor.
    pub quality: f64,
    /// Community factor.
    pub community: f64,
}

/// A user's trust score (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScore {
    /// Score between 0 and 100.
    pub score: f64,
    /// Tier implied by the score.
    pub tier: SubscriptionTier,
    /// Factor breakdown.
    pub factors: TrustScoreFactors,
    /// When the score was computed.
    pub calculated_at: DateTime<Utc>,
    /// When the cached score goes stale.
    pub expires_at: DateTime<Utc>,
    /// Recent direction.
    pub trend: TrendDirection,
    /// Change since the previous score.
    pub change: f64,
    /// Last update time.
    pub last_updated: DateTime<Utc>,
}

/// Body of `POST /dashboard/trustscore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScoreCalculationRequest {
    /// User to score.
    pub user_id: String,
    /// Recalculate even if a fresh score is cached.
    #[serde(default)]
    pub force: bool,
    /// Restrict the calculation to these factors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<Vec<ScoreFactor>>,
}

impl TrustScoreCalculationRequest {
    /// Request for `user_id` with no options.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            force: false,
            factors: None,
        }
    }

    /// Sets the force flag.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Restricts the calculation to `factors`.
    #[must_use]
    pub fn factors(mut self, factors: impl IntoIterator<Item = ScoreFactor>) -> Self {
        self.factors = Some(factors.into_iter().collect());
        self
    }
}

/// A queued or finished calculation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScoreCalculation {
    /// Job id.
    pub calculation_id: String,
    /// Job state.
    pub status: CalculationStatus,
    /// Estimated seconds until completion.
    pub estimated_time: u64,
    /// When the job started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}
