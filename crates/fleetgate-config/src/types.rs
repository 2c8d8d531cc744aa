//! The [`GatingConfig`] struct and its defaults.

use std::time::Duration;

use fleetgate_core::ControlLevel;
use serde::{Deserialize, Serialize};

fn default_recent_access_window() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_max_metric_points() -> usize {
    120
}

fn default_rate_limit_log_interval() -> Duration {
    Duration::from_secs(10)
}

/// The six configuration options the gating core recognizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingConfig {
    /// When true, write actions against undiscovered resources are
    /// blocked with `STRICT_RESOLUTION`.
    pub strict_resolution: bool,

    /// The host's current control level.
    pub control_level: ControlLevel,

    /// Disables Docker container image-update queueing.
    pub disable_update_actions: bool,

    /// Duration defining "recently referenced" for routing validation.
    #[serde(with = "duration_secs")]
    pub recent_access_window: Duration,

    /// Default downsampling target for metric series.
    pub max_metric_points: usize,

    /// Minimum spacing for rate-limited debug logs.
    #[serde(with = "duration_secs")]
    pub rate_limit_log_interval: Duration,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            strict_resolution: false,
            control_level: ControlLevel::default(),
            disable_update_actions: false,
            recent_access_window: default_recent_access_window(),
            max_metric_points: default_max_metric_points(),
            rate_limit_log_interval: default_rate_limit_log_interval(),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let config = GatingConfig::default();
        assert!(!config.strict_resolution);
        assert_eq!(config.control_level, ControlLevel::Controlled);
        assert!(!config.disable_update_actions);
        assert_eq!(config.recent_access_window, Duration::from_secs(300));
        assert_eq!(config.max_metric_points, 120);
        assert_eq!(config.rate_limit_log_interval, Duration::from_secs(10));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = GatingConfig {
            strict_resolution: true,
            control_level: ControlLevel::ReadOnly,
            ..GatingConfig::default()
        };
        let serialized = toml::to_string(&config).unwrap();
        let parsed: GatingConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
