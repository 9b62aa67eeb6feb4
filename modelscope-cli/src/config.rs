//! Configuration module
//!
//! Merges global CLI flags with the runner's environment configuration.

use anyhow::{Context, Result};
use modelscope_runner::{Locale, OperationError, RunnerConfig, describe_error};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Access token from `--access-token` or the environment
    pub access_token: Option<String>,

    /// URL of the inference API
    pub base_url: String,

    /// Language of error messages
    pub locale: Locale,

    /// Print raw JSON instead of summaries
    pub json: bool,
}

impl Config {
    /// Builds the runner configuration
    ///
    /// Poll and timeout settings come from the `MODELSCOPE_*` environment
    /// variables whether the token was passed by flag or by environment.
    /// Flags given on the command line take precedence.
    pub fn runner_config(&self) -> Result<RunnerConfig> {
        let token = self
            .access_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .context("missing access token: pass --access-token or set MODELSCOPE_ACCESS_TOKEN")?;

        let mut config = RunnerConfig::new(token).apply_env()?;
        config.base_url = self.base_url.clone();
        config.locale = self.locale;
        config.validate()?;

        Ok(config)
    }

    /// Turns an operation error into a localized CLI error
    pub fn user_error(&self, err: OperationError) -> anyhow::Error {
        anyhow::anyhow!(describe_error(&err, self.locale))
    }
}
