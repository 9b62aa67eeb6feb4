//! Runner configuration
//!
//! Defines the connection settings, the polling policy for image jobs and
//! the defaults applied to each work item.

use std::time::Duration;

use modelscope_client::{ClientConfig, DEFAULT_BASE_URL};

use crate::service::Locale;

/// Backoff schedule between two status polls of the same job
///
/// The delay starts at `base_interval`, is multiplied by `growth_factor`
/// after every non-terminal poll and never exceeds `ceiling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub base_interval: Duration,
    pub growth_factor: f64,
    pub ceiling: Duration,
}

impl PollPolicy {
    pub fn new(base_interval: Duration, growth_factor: f64, ceiling: Duration) -> Self {
        Self {
            base_interval,
            growth_factor,
            ceiling,
        }
    }

    /// Validates the policy
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_interval.is_zero() {
            anyhow::bail!("poll base interval must be greater than 0");
        }

        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            anyhow::bail!("poll growth factor must be a finite number >= 1.0");
        }

        if self.ceiling < self.base_interval {
            anyhow::bail!("poll ceiling must not be below the base interval");
        }

        Ok(())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(5),
            growth_factor: 1.3,
            ceiling: Duration::from_secs(15),
        }
    }
}

/// Runner configuration
///
/// Everything a caller would otherwise pull from the host environment
/// (credential, endpoint, presentation language) is passed in explicitly.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// ModelScope access token
    pub access_token: String,

    /// API base URL (e.g., "https://api-inference.modelscope.cn/v1")
    pub base_url: String,

    /// Timeout of a single HTTP request
    pub request_timeout: Duration,

    /// Backoff schedule for image task polling
    pub poll: PollPolicy,

    /// Default wall-clock budget of one image job
    pub image_timeout: Duration,

    /// Record failed items and keep going instead of aborting the batch
    pub continue_on_fail: bool,

    /// Language of user-facing error messages
    pub locale: Locale,
}

impl RunnerConfig {
    /// Creates a new configuration with defaults
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
            poll: PollPolicy::default(),
            image_timeout: Duration::from_secs(5 * 60), // 5 minutes
            continue_on_fail: false,
            locale: Locale::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MODELSCOPE_ACCESS_TOKEN (required)
    /// - MODELSCOPE_BASE_URL (optional, default: public endpoint)
    /// - MODELSCOPE_REQUEST_TIMEOUT (optional, seconds, default: 60)
    /// - MODELSCOPE_POLL_BASE_MS (optional, default: 5000)
    /// - MODELSCOPE_POLL_GROWTH (optional, default: 1.3)
    /// - MODELSCOPE_POLL_CEILING_MS (optional, default: 15000)
    /// - MODELSCOPE_IMAGE_TIMEOUT_MINUTES (optional, default: 5)
    /// - MODELSCOPE_CONTINUE_ON_FAIL (optional, default: false)
    /// - MODELSCOPE_LOCALE (optional, en|zh, default: en)
    pub fn from_env() -> anyhow::Result<Self> {
        let access_token = std::env::var("MODELSCOPE_ACCESS_TOKEN")
            .map_err(|_| anyhow::anyhow!("MODELSCOPE_ACCESS_TOKEN environment variable not set"))?;

        Self::new(access_token).apply_env()
    }

    /// Overlays every `MODELSCOPE_*` setting except the access token
    ///
    /// Unset or unparsable values keep the current setting.
    pub fn apply_env(mut self) -> anyhow::Result<Self> {
        if let Ok(base_url) = std::env::var("MODELSCOPE_BASE_URL") {
            self.base_url = base_url;
        }

        self.request_timeout = std::env::var("MODELSCOPE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.request_timeout);

        self.poll.base_interval = std::env::var("MODELSCOPE_POLL_BASE_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(self.poll.base_interval);

        self.poll.growth_factor = std::env::var("MODELSCOPE_POLL_GROWTH")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(self.poll.growth_factor);

        self.poll.ceiling = std::env::var("MODELSCOPE_POLL_CEILING_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(self.poll.ceiling);

        self.image_timeout = std::env::var("MODELSCOPE_IMAGE_TIMEOUT_MINUTES")
            .ok()
            .and_then(|s| parse_minutes(&s))
            .unwrap_or(self.image_timeout);

        self.continue_on_fail = std::env::var("MODELSCOPE_CONTINUE_ON_FAIL")
            .ok()
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(self.continue_on_fail);

        if let Ok(locale) = std::env::var("MODELSCOPE_LOCALE") {
            self.locale = locale.parse()?;
        }

        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Connection settings for the HTTP client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.access_token.clone())
            .with_base_url(self.base_url.clone())
            .with_request_timeout(Some(self.request_timeout))
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.access_token.trim().is_empty() {
            anyhow::bail!("access_token cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.image_timeout.is_zero() {
            anyhow::bail!("image_timeout must be greater than 0");
        }

        self.poll.validate()
    }
}

/// Whole minutes to a duration, `None` when unparsable or out of range
fn parse_minutes(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(|minutes| minutes.checked_mul(60))
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poll_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.base_interval, Duration::from_secs(5));
        assert_eq!(policy.growth_factor, 1.3);
        assert_eq!(policy.ceiling, Duration::from_secs(15));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_poll_policy_validation() {
        let mut policy = PollPolicy::default();

        policy.growth_factor = 0.9;
        assert!(policy.validate().is_err());

        policy.growth_factor = f64::NAN;
        assert!(policy.validate().is_err());

        policy = PollPolicy::default();
        policy.ceiling = Duration::from_secs(1);
        assert!(policy.validate().is_err());

        policy = PollPolicy::default();
        policy.base_interval = Duration::ZERO;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RunnerConfig::new("ms-token".to_string());

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Empty token should fail
        config.access_token = String::new();
        assert!(config.validate().is_err());

        config.access_token = "ms-token".to_string();

        // Invalid URL should fail
        config.base_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:8080/v1".to_string();
        assert!(config.validate().is_ok());

        config.image_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_config() {
        let config = RunnerConfig::new("ms-token".to_string()).with_base_url("http://localhost:9/v1");
        let client_config = config.client_config();
        assert_eq!(client_config.base_url, "http://localhost:9/v1");
        assert_eq!(client_config.access_token, "ms-token");
        assert_eq!(client_config.request_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_parse_minutes_rejects_overflow() {
        assert_eq!(parse_minutes("9"), Some(Duration::from_secs(540)));
        assert_eq!(parse_minutes(" 2 "), Some(Duration::from_secs(120)));
        assert_eq!(parse_minutes(&u64::MAX.to_string()), None);
        assert_eq!(parse_minutes("soon"), None);
    }
}
