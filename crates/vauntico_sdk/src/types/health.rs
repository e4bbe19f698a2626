//! System health.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

wire_enum! {
    /// Overall system state.
    pub enum HealthStatus {
        /// All services up.
        Healthy => "healthy",
        /// Some services impaired.
        Degraded => "degraded",
        /// System unavailable.
        Unhealthy => "unhealthy",
    }
}

wire_enum! {
    /// State of one backing service.
    pub enum ServiceStatus {
        /// Responding normally.
        Up => "up",
        /// Not responding.
        Down => "down",
        /// Responding slowly or partially.
        Degraded => "degraded",
    }
}

/// Health of one backing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    /// Service state.
    pub status: ServiceStatus,
    /// Probe latency in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    /// Time of the last probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<DateTime<Utc>>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall state.
    pub status: HealthStatus,
    /// Server time of the check.
    pub timestamp: DateTime<Utc>,
    /// Seconds since start; may be fractional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    /// Per-service health keyed by service name.
    pub services: BTreeMap<String, ServiceHealth>,
}

impl HealthCheck {
    /// True when the system reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    /// Names of services that are not up.
    pub fn impaired_services(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|(_, health)| health.status != ServiceStatus::Up)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
