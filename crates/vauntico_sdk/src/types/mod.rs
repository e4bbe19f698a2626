//! Typed request and response records.
//!
//! JSON field names are camelCase on the wire and snake_case in Rust. Records
//! ignore unknown fields; missing required fields are a decode error.

use thiserror::Error;

/// Declares a string-valued wire enum with `as_str`, `Display` and `FromStr`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::types::ParseEnumError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err($crate::types::ParseEnumError::new(
                        stringify!($name),
                        s,
                        Self::ALL.iter().map(|v| v.as_str()),
                    )),
                }
            }
        }
    };
}

mod envelope;
mod features;
mod health;
mod trend;
mod trust_score;
mod user;

pub use envelope::{
    ErrorEnvelope, ErrorMetadata, RateLimitEnvelope, RateLimitQuota, ResponseMetadata,
    SuccessEnvelope,
};
pub use features::{FeaturesMetadata, FeaturesResponse, SacredFeature};
pub use health::{HealthCheck, HealthStatus, ServiceHealth, ServiceStatus};
pub use trend::{TrendDataPoint, TrendMetadata, TrendResponse};
pub use trust_score::{
    CalculationStatus, ScoreFactor, TrustScore, TrustScoreCalculation,
    TrustScoreCalculationRequest, TrustScoreFactors,
};
pub use user::{SubscriptionInfo, SubscriptionStatus, User};

/// A string did not name any variant of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl ParseEnumError {
    fn new<'a>(kind: &'static str, value: &str, expected: impl Iterator<Item = &'a str>) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.collect::<Vec<_>>().join(", "),
        }
    }
}

wire_enum! {
    /// Subscription tier; also the level that unlocks a sacred feature.
    pub enum SubscriptionTier {
        /// Entry tier.
        Bronze => "bronze",
        /// Second tier.
        Silver => "silver",
        /// Third tier.
        Gold => "gold",
        /// Top tier.
        Platinum => "platinum",
    }
}

wire_enum! {
    /// Availability of a sacred feature for the user.
    pub enum FeatureStatus {
        /// Unlocked and usable.
        Active => "active",
        /// Requires a higher tier.
        Locked => "locked",
        /// Announced, not yet available.
        ComingSoon => "coming-soon",
        /// Being phased out.
        Deprecated => "deprecated",
    }
}

wire_enum! {
    /// Product area a feature belongs to.
    pub enum FeatureCategory {
        /// Content tools.
        Content => "content",
        /// Analytics.
        Analytics => "analytics",
        /// Community features.
        Community => "community",
        /// Commerce.
        Commerce => "commerce",
        /// Support.
        Support => "support",
        /// AI features.
        Ai => "ai",
    }
}

wire_enum! {
    /// Window covered by a trend query.
    #[derive(Default)]
    pub enum Timeframe {
        /// Last 7 days.
        Days7 => "7d",
        /// Last 30 days.
        #[default]
        Days30 => "30d",
        /// Last 90 days.
        Days90 => "90d",
        /// Last year.
        Year1 => "1y",
    }
}

wire_enum! {
    /// Bucket size of trend data points.
    #[derive(Default)]
    pub enum Granularity {
        /// One point per day.
        #[default]
        Daily => "daily",
        /// One point per week.
        Weekly => "weekly",
        /// One point per month.
        Monthly => "monthly",
    }
}

wire_enum! {
    /// Direction of recent score movement.
    pub enum TrendDirection {
        /// Rising.
        Up => "up",
        /// Falling.
        Down => "down",
        /// Flat.
        Stable => "stable",
    }
}
