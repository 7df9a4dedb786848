//! Configuration for the dispatcher

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// What to do after a handler times out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Record the timeout and run the next handler
    #[default]
    Skip,

    /// Record the timeout and skip the remaining handlers
    Abort,
}

impl TimeoutPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for TimeoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeoutPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown timeout policy: {}", other)),
        }
    }
}

/// Configuration for the dispatcher
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// Time limit for each handler; `None` lets handlers run unbounded
    pub handler_timeout: Option<Duration>,

    /// Behaviour after a timeout
    pub timeout_policy: TimeoutPolicy,
}

impl DispatchConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::new()
    }
}

/// Builder for DispatchConfig
#[derive(Debug, Clone, Default)]
pub struct DispatchConfigBuilder {
    config: DispatchConfig,
}

impl DispatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-handler timeout
    pub fn handler_timeout(mut self, timeout: Duration) -> Self {
        self.config.handler_timeout = Some(timeout);
        self
    }

    /// Set the per-handler timeout in seconds
    pub fn handler_timeout_secs(mut self, secs: u64) -> Self {
        self.config.handler_timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Remove the per-handler timeout
    pub fn no_timeout(mut self) -> Self {
        self.config.handler_timeout = None;
        self
    }

    /// Set the timeout policy
    pub fn timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.config.timeout_policy = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DispatchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::default();
        assert!(config.handler_timeout.is_none());
        assert_eq!(config.timeout_policy, TimeoutPolicy::Skip);
    }

    #[test]
    fn test_builder() {
        let config = DispatchConfig::builder()
            .handler_timeout_secs(30)
            .timeout_policy(TimeoutPolicy::Abort)
            .build();

        assert_eq!(config.handler_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.timeout_policy, TimeoutPolicy::Abort);

        let config = DispatchConfig::builder()
            .handler_timeout_secs(30)
            .no_timeout()
            .build();
        assert!(config.handler_timeout.is_none());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse::<TimeoutPolicy>(), Ok(TimeoutPolicy::Skip));
        assert_eq!("ABORT".parse::<TimeoutPolicy>(), Ok(TimeoutPolicy::Abort));
        assert!("retry".parse::<TimeoutPolicy>().is_err());
    }
}
