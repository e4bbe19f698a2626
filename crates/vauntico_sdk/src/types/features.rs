//! Sacred features unlocked by subscription tier.

use super::{FeatureCategory, FeatureStatus, SubscriptionTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A gated product feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SacredFeature {
    /// Feature id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Icon identifier.
    pub icon: String,
    /// Availability for this user.
    pub status: FeatureStatus,
    /// Tier that unlocks the feature.
    pub sacred_level: SubscriptionTier,
    /// Unlock progress, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Planned availability date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_date: Option<DateTime<Utc>>,
    /// Product area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FeatureCategory>,
    /// What the feature offers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    /// What it takes to unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
}

/// Summary of a feature listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesMetadata {
    /// API version.
    pub version: String,
    /// Endpoint that produced the listing.
    pub endpoint: String,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
    /// Next feature the user is closest to unlocking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_unlock_feature: Option<String>,
    /// Progress towards it, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_unlock_progress: Option<f64>,
}

/// Response of `GET /dashboard/features`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesResponse {
    /// Features matching the query.
    pub features: Vec<SacredFeature>,
    /// The user's tier.
    pub user_level: SubscriptionTier,
    /// Features the user has unlocked.
    pub unlocked_count: u32,
    /// All features.
    pub total_count: u32,
    /// Listing summary.
    pub metadata: FeaturesMetadata,
}

impl FeaturesResponse {
    /// Features currently usable.
    pub fn unlocked(&self) -> impl Iterator<Item = &SacredFeature> {
        self.features
            .iter()
            .filter(|f| f.status == FeatureStatus::Active)
    }
}
