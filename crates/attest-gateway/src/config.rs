//! Signing-agent bridge configuration.
//!
//! The agent bridge is a local HTTP endpoint exposed by the signing agent.
//! Override via environment variables or explicit construction for testing.

use url::Url;

/// Default time allowed for calls that wait on the user (authorize, issue).
pub const DEFAULT_INTERACTION_TIMEOUT_SECS: u64 = 300;

/// Default time allowed for non-interactive probes.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Configuration for [`crate::HttpExtensionGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Base URL of the agent bridge (e.g. `http://127.0.0.1:3901`).
    pub url: Url,
    /// Timeout for calls that suspend on user interaction.
    pub interaction_timeout_secs: u64,
    /// Timeout for installation probes and credential fetches.
    pub probe_timeout_secs: u64,
}

impl AgentConfig {
    /// Create a configuration with default timeouts.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            interaction_timeout_secs: DEFAULT_INTERACTION_TIMEOUT_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ATTEST_AGENT_URL` (required)
    /// - `ATTEST_AGENT_INTERACTION_TIMEOUT_SECS` (default: 300)
    /// - `ATTEST_AGENT_PROBE_TIMEOUT_SECS` (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source using the
    /// [`from_env`](Self::from_env) variable names. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let raw = value("ATTEST_AGENT_URL").ok_or(ConfigError::Missing("ATTEST_AGENT_URL"))?;
        let url =
            Url::parse(&raw).map_err(|e| ConfigError::Invalid("ATTEST_AGENT_URL", e.to_string()))?;

        Ok(Self {
            url,
            interaction_timeout_secs: parse_u64(
                value("ATTEST_AGENT_INTERACTION_TIMEOUT_SECS"),
                "ATTEST_AGENT_INTERACTION_TIMEOUT_SECS",
                DEFAULT_INTERACTION_TIMEOUT_SECS,
            )?,
            probe_timeout_secs: parse_u64(
                value("ATTEST_AGENT_PROBE_TIMEOUT_SECS"),
                "ATTEST_AGENT_PROBE_TIMEOUT_SECS",
                DEFAULT_PROBE_TIMEOUT_SECS,
            )?,
        })
    }
}

fn parse_u64(raw: Option<String>, var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(var, format!("{raw:?} is not a whole number of seconds"))),
        None => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn new_uses_default_timeouts() {
        let cfg = AgentConfig::new(Url::parse("http://127.0.0.1:3901").unwrap());
        assert_eq!(cfg.interaction_timeout_secs, 300);
        assert_eq!(cfg.probe_timeout_secs, 5);
    }

    #[test]
    fn lookup_reads_url_and_timeouts() {
        let cfg = AgentConfig::from_lookup(vars(&[
            ("ATTEST_AGENT_URL", " http://127.0.0.1:3901 "),
            ("ATTEST_AGENT_PROBE_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.url.as_str(), "http://127.0.0.1:3901/");
        assert_eq!(cfg.probe_timeout_secs, 2);
        assert_eq!(cfg.interaction_timeout_secs, 300);
    }

    #[test]
    fn missing_or_blank_url_is_an_error() {
        assert!(matches!(
            AgentConfig::from_lookup(vars(&[])),
            Err(ConfigError::Missing("ATTEST_AGENT_URL"))
        ));
        assert!(matches!(
            AgentConfig::from_lookup(vars(&[("ATTEST_AGENT_URL", "  ")])),
            Err(ConfigError::Missing("ATTEST_AGENT_URL"))
        ));
    }

    #[test]
    fn garbage_timeout_names_the_variable() {
        let err = AgentConfig::from_lookup(vars(&[
            ("ATTEST_AGENT_URL", "http://127.0.0.1:3901"),
            ("ATTEST_AGENT_INTERACTION_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("ATTEST_AGENT_INTERACTION_TIMEOUT_SECS", _)
        ));
    }

    #[test]
    fn from_env_reads_process_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        let prev = std::env::var("ATTEST_AGENT_URL").ok();
        std::env::set_var("ATTEST_AGENT_URL", "http://127.0.0.1:4000");

        let result = AgentConfig::from_env();

        match prev {
            Some(v) => std::env::set_var("ATTEST_AGENT_URL", v),
            None => std::env::remove_var("ATTEST_AGENT_URL"),
        }
        assert_eq!(result.unwrap().url.as_str(), "http://127.0.0.1:4000/");
    }
}
