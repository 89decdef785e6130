//! Simulator configuration
//!
//! Defines the polling cadence and the optional attempt cap. By default
//! polling is unbounded: a job that never reaches a terminal state keeps the
//! workflow waiting until the process is stopped. Deployments that want a
//! bound set [`SimulatorConfig::max_poll_attempts`].

use std::time::Duration;

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Wait between status checks for bulk uploads, training runs, and the
    /// combined predict-upload-retrain streaming loop
    pub poll_interval: Duration,

    /// Wait between status checks for batch predictions and plain
    /// day-by-day streaming, where the service works through larger jobs
    pub stream_poll_interval: Duration,

    /// Give up on a job after this many status checks; `None` polls forever
    pub max_poll_attempts: Option<u32>,
}

impl SimulatorConfig {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            stream_poll_interval: Duration::from_secs(10),
            max_poll_attempts: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TD_POLL_INTERVAL (optional, seconds, default: 5)
    /// - TD_STREAM_POLL_INTERVAL (optional, seconds, default: 10)
    /// - TD_MAX_POLL_ATTEMPTS (optional, default: unbounded)
    pub fn from_env() -> Self {
        let poll_interval = std::env::var("TD_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        let stream_poll_interval = std::env::var("TD_STREAM_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let max_poll_attempts = std::env::var("TD_MAX_POLL_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok());

        Self {
            poll_interval,
            stream_poll_interval,
            max_poll_attempts,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.stream_poll_interval.is_zero() {
            anyhow::bail!("stream_poll_interval must be greater than 0");
        }

        if self.max_poll_attempts == Some(0) {
            anyhow::bail!("max_poll_attempts must be greater than 0 when set");
        }

        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.stream_poll_interval, Duration::from_secs(10));
        assert_eq!(config.max_poll_attempts, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimulatorConfig::default();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config = SimulatorConfig::default();
        config.max_poll_attempts = Some(0);
        assert!(config.validate().is_err());

        config.max_poll_attempts = Some(120);
        assert!(config.validate().is_ok());
    }
}
