//! Verification service configuration.

use url::Url;

/// Default request timeout for submissions and health probes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retries after a transport failure.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Where and how to reach the verification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Submission endpoint (e.g. `http://localhost:7676/verify-attestation`).
    pub endpoint: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after a transport failure. HTTP error statuses are never retried.
    pub max_retries: u32,
}

impl VerifierConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ATTEST_VERIFIER_URL` (required)
    /// - `ATTEST_VERIFIER_TIMEOUT_SECS` (default: 30)
    /// - `ATTEST_VERIFIER_MAX_RETRIES` (default: 2)
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

        let raw = value("ATTEST_VERIFIER_URL").ok_or(ConfigError::Missing("ATTEST_VERIFIER_URL"))?;
        let endpoint = Url::parse(&raw)
            .map_err(|e| ConfigError::Invalid("ATTEST_VERIFIER_URL", e.to_string()))?;

        Ok(Self {
            endpoint,
            timeout_secs: parse_or(
                value("ATTEST_VERIFIER_TIMEOUT_SECS"),
                "ATTEST_VERIFIER_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?,
            max_retries: parse_or(
                value("ATTEST_VERIFIER_MAX_RETRIES"),
                "ATTEST_VERIFIER_MAX_RETRIES",
                DEFAULT_MAX_RETRIES,
            )?,
        })
    }

    /// `<scheme>://<host>[:port]/health` of the endpoint's service.
    pub fn health_url(&self) -> Result<Url, ConfigError> {
        self.endpoint
            .join("/health")
            .map_err(|e| ConfigError::Invalid("health URL", e.to_string()))
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(var, format!("{raw:?} is not a whole number"))),
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
    fn health_url_replaces_path() {
        let cfg = VerifierConfig::new(Url::parse("http://localhost:7676/verify-attestation").unwrap());
        assert_eq!(cfg.health_url().unwrap().as_str(), "http://localhost:7676/health");
    }

    #[test]
    fn defaults() {
        let cfg = VerifierConfig::new(Url::parse("https://verifier.example/verify").unwrap());
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_retries, 2);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let cfg = VerifierConfig::from_lookup(vars(&[
            ("ATTEST_VERIFIER_URL", "http://localhost:7676/verify-attestation"),
            ("ATTEST_VERIFIER_MAX_RETRIES", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn bad_values_name_the_variable() {
        assert!(matches!(
            VerifierConfig::from_lookup(vars(&[])),
            Err(ConfigError::Missing("ATTEST_VERIFIER_URL"))
        ));
        assert!(matches!(
            VerifierConfig::from_lookup(vars(&[("ATTEST_VERIFIER_URL", "not a url")])),
            Err(ConfigError::Invalid("ATTEST_VERIFIER_URL", _))
        ));
        assert!(matches!(
            VerifierConfig::from_lookup(vars(&[
                ("ATTEST_VERIFIER_URL", "http://localhost:7676/verify"),
                ("ATTEST_VERIFIER_MAX_RETRIES", "-1"),
            ])),
            Err(ConfigError::Invalid("ATTEST_VERIFIER_MAX_RETRIES", _))
        ));
    }

    #[test]
    fn from_env_reads_process_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        let prev = std::env::var("ATTEST_VERIFIER_URL").ok();
        std::env::set_var("ATTEST_VERIFIER_URL", "http://localhost:9999/verify");

        let result = VerifierConfig::from_env();

        match prev {
            Some(v) => std::env::set_var("ATTEST_VERIFIER_URL", v),
            None => std::env::remove_var("ATTEST_VERIFIER_URL"),
        }
        assert_eq!(result.unwrap().endpoint.as_str(), "http://localhost:9999/verify");
    }
}
