//! Signing configuration.
//!
//! The schema identifier and the agent theme URL are deployment values and
//! are never compiled in.

use url::Url;

use attest_core::SchemaSaid;

/// Values the workflow passes to the signing agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    /// Schema the data-attestation credential is issued under.
    pub schema_said: SchemaSaid,
    /// Vendor theme applied to the agent during `initialize`.
    pub theme_url: Option<Url>,
}

impl SigningConfig {
    pub fn new(schema_said: SchemaSaid) -> Self {
        Self {
            schema_said,
            theme_url: None,
        }
    }

    pub fn with_theme_url(mut self, url: Url) -> Self {
        self.theme_url = Some(url);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ATTEST_SCHEMA_SAID` (required)
    /// - `ATTEST_EXTENSION_THEME_URL` (optional)
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

        let raw = value("ATTEST_SCHEMA_SAID").ok_or(ConfigError::Missing("ATTEST_SCHEMA_SAID"))?;
        let schema_said = SchemaSaid::new(raw)
            .map_err(|e| ConfigError::Invalid("ATTEST_SCHEMA_SAID", e.to_string()))?;

        let theme_url = value("ATTEST_EXTENSION_THEME_URL")
            .map(|raw| {
                Url::parse(&raw)
                    .map_err(|e| ConfigError::Invalid("ATTEST_EXTENSION_THEME_URL", e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            schema_said,
            theme_url,
        })
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
    fn builder_sets_theme() {
        let cfg = SigningConfig::new(SchemaSaid::new("ESchema").unwrap())
            .with_theme_url(Url::parse("https://vendor.example/theme.json").unwrap());
        assert_eq!(
            cfg.theme_url.as_ref().map(Url::as_str),
            Some("https://vendor.example/theme.json")
        );
    }

    #[test]
    fn lookup_reads_schema_and_theme() {
        let cfg = SigningConfig::from_lookup(vars(&[
            ("ATTEST_SCHEMA_SAID", "ESchema"),
            ("ATTEST_EXTENSION_THEME_URL", "https://vendor.example/t.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.schema_said.as_str(), "ESchema");
        assert_eq!(
            cfg.theme_url.map(String::from).as_deref(),
            Some("https://vendor.example/t.json")
        );
    }

    #[test]
    fn blank_theme_is_unset() {
        let cfg = SigningConfig::from_lookup(vars(&[
            ("ATTEST_SCHEMA_SAID", "ESchema"),
            ("ATTEST_EXTENSION_THEME_URL", " "),
        ]))
        .unwrap();
        assert!(cfg.theme_url.is_none());
    }

    #[test]
    fn schema_is_required_and_validated() {
        assert!(matches!(
            SigningConfig::from_lookup(vars(&[])),
            Err(ConfigError::Missing("ATTEST_SCHEMA_SAID"))
        ));
        assert!(matches!(
            SigningConfig::from_lookup(vars(&[("ATTEST_SCHEMA_SAID", "E bad")])),
            Err(ConfigError::Invalid("ATTEST_SCHEMA_SAID", _))
        ));
    }

    #[test]
    fn from_env_reads_process_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        let prev = std::env::var("ATTEST_SCHEMA_SAID").ok();
        std::env::set_var("ATTEST_SCHEMA_SAID", "ESchemaFromEnv");

        let result = SigningConfig::from_env();

        match prev {
            Some(v) => std::env::set_var("ATTEST_SCHEMA_SAID", v),
            None => std::env::remove_var("ATTEST_SCHEMA_SAID"),
        }
        assert_eq!(result.unwrap().schema_said.as_str(), "ESchemaFromEnv");
    }
}
