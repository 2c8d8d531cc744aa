//! Validation applied after a config file is merged over defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::types::GatingConfig;

/// Reject configurations with nonsensical values that would otherwise
/// silently degrade safety (a zero downsampling target, a log interval
/// of zero defeating the rate limiter).
pub fn validate(config: &GatingConfig) -> ConfigResult<()> {
    if config.max_metric_points == 0 {
        return Err(ConfigError::Invalid(
            "max_metric_points must be greater than zero".to_string(),
        ));
    }
    if config.rate_limit_log_interval.is_zero() {
        return Err(ConfigError::Invalid(
            "rate_limit_log_interval must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
