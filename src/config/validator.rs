//! Config validation.

use super::RunConfig;
use crate::error::ConfigError;
use crate::policy::{EXIT_CRITERIA_COUNT, MAX_TREND_WINDOW_DAYS};

/// Validate run parameters and policy before any metric runs.
pub fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.trend_window_days == 0 {
        return Err(ConfigError::ValidationFailed(
            "Trend window must cover at least one day".to_string(),
        ));
    }

    if config.trend_window_days > MAX_TREND_WINDOW_DAYS {
        return Err(ConfigError::ValidationFailed(format!(
            "Trend window of {} days exceeds the maximum of {} days",
            config.trend_window_days, MAX_TREND_WINDOW_DAYS
        )));
    }

    if config.executed_cases > config.total_cases {
        return Err(ConfigError::ValidationFailed(format!(
            "Executed test cases ({}) exceed planned test cases ({})",
            config.executed_cases, config.total_cases
        )));
    }

    validate_policy_thresholds(config)?;
    Ok(())
}

fn validate_policy_thresholds(config: &RunConfig) -> Result<(), ConfigError> {
    let policy = &config.policy;

    if policy.required_passes > EXIT_CRITERIA_COUNT {
        return Err(ConfigError::ValidationFailed(format!(
            "Approval requires {} passing criteria but only {} exist",
            policy.required_passes, EXIT_CRITERIA_COUNT
        )));
    }

    let percentages = [
        ("min_coverage", policy.min_coverage),
        ("min_resolution_rate", policy.min_resolution_rate),
        ("min_testing_efficiency", policy.min_testing_efficiency),
    ];
    for (name, value) in percentages {
        if !(0.0..=100.0).contains(&value) {
            return Err(ConfigError::ValidationFailed(format!(
                "{} must be a percentage between 0 and 100, got {}",
                name, value
            )));
        }
    }

    if policy.max_average_resolution_days < 0.0 {
        return Err(ConfigError::ValidationFailed(format!(
            "max_average_resolution_days cannot be negative, got {}",
            policy.max_average_resolution_days
        )));
    }

    Ok(())
}
