//! User profiles.

use super::SubscriptionTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

wire_enum! {
    /// Billing state of a subscription.
    pub enum SubscriptionStatus {
        /// Paid up.
        Active => "active",
        /// Not started or lapsed.
        Inactive => "inactive",
        /// Cancelled by the user.
        Cancelled => "cancelled",
        /// Payment overdue.
        PastDue => "past_due",
    }
}

/// Subscription attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    /// Subscribed tier.
    pub tier: SubscriptionTier,
    /// Billing state.
    pub status: SubscriptionStatus,
    /// Billing period bounds, e.g. `start` and `end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<BTreeMap<String, String>>,
    /// API quota counters, e.g. `limit` and `used`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_quota: Option<BTreeMap<String, f64>>,
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Handle.
    pub username: String,
    /// Name shown in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Current tier.
    pub tier: SubscriptionTier,
    /// Active subscription, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionInfo>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
    /// Most recent sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// Whether the email is verified.
    pub verified: bool,
}
