//! Console configuration
//!
//! The console itself keeps no durable state; its only local configuration
//! is how to reach the backend and whether this session may write.

use anyhow::{Context, Result};
use platform_client::PlatformClient;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

fn default_poll_interval() -> u64 {
    5
}

/// Local configuration of the console, loaded from a YAML file with
/// `FLOWOPS_URL` / `FLOWOPS_TOKEN` environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the backend admin API.
    pub base_url: String,
    /// Bearer token sent on every request.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Refuse mutating operations in this session.
    #[serde(default)]
    pub read_only: bool,
    /// Fixed refetch interval of the jobs view, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl ConsoleConfig {
    /// Load the configuration file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read console config {}", path.display()))?;
        let mut config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse console config {}", path.display()))?;

        if let Ok(url) = std::env::var("FLOWOPS_URL") {
            config.base_url = url;
        }
        if let Ok(token) = std::env::var("FLOWOPS_TOKEN") {
            config.api_token = Some(token);
        }
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Build the API client this configuration describes.
    pub fn client(&self) -> PlatformClient {
        let client = PlatformClient::new(&self.base_url);
        match &self.api_token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    /// The capability value passed into mutating commands.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_write: !self.read_only,
        }
    }

    /// The jobs view refetch interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// What this console session is allowed to do.
///
/// Derived once from the configuration and passed explicitly into the
/// commands that mutate backend state.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Whether mutating operations are allowed.
    pub can_write: bool,
}

impl Capabilities {
    /// Fail unless this session may write.
    pub fn require_write(&self) -> Result<()> {
        if !self.can_write {
            anyhow::bail!("this console session is read-only; writes are not permitted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_config() {
        let config = ConsoleConfig::parse("base_url: https://console.example.com/api\n").unwrap();
        assert_eq!(config.base_url, "https://console.example.com/api");
        assert!(config.api_token.is_none());
        assert!(!config.read_only);
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn parses_a_full_config() {
        let yaml = r#"
base_url: http://localhost:8080
api_token: secret
read_only: true
poll_interval_secs: 10
"#;
        let config = ConsoleConfig::parse(yaml).unwrap();
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert!(config.read_only);
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
    }

    #[test]
    fn missing_base_url_is_an_error() {
        assert!(ConsoleConfig::parse("read_only: true\n").is_err());
    }

    #[test]
    fn read_only_blocks_writes() {
        let config = ConsoleConfig::parse("base_url: http://localhost\nread_only: true\n").unwrap();
        assert!(config.capabilities().require_write().is_err());

        let config = ConsoleConfig::parse("base_url: http://localhost\n").unwrap();
        assert!(config.capabilities().require_write().is_ok());
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let config =
            ConsoleConfig::parse("base_url: http://localhost\npoll_interval_secs: 0\n").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
