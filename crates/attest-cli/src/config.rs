//! # Layered CLI Configuration
//!
//! Values come from an optional YAML file, then `ATTEST_*` environment
//! variables override them:
//!
//! ```yaml
//! log_level: info
//! agent:
//!   url: http://127.0.0.1:3901
//!   interaction_timeout_secs: 300
//! signing:
//!   schema_said: ENDcMNUZjag27T_GTxiCmB2kYstg_kqipqz39906E_FD
//!   theme_url: https://vendor.example/theme.json
//! verifier:
//!   url: http://localhost:7676/verify-attestation
//!   max_retries: 2
//! ```
//!
//! Required values are only checked when a subcommand needs them, so
//! `attest digest` works without any configuration.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use attest_gateway::AgentConfig;
use attest_verifier::VerifierConfig;
use attest_workflow::SigningConfig;

/// Every recognised setting: environment variable and config-file key.
pub const SETTINGS: &[(&str, &str)] = &[
    ("ATTEST_LOG_LEVEL", "log_level"),
    ("ATTEST_AGENT_URL", "agent.url"),
    ("ATTEST_AGENT_INTERACTION_TIMEOUT_SECS", "agent.interaction_timeout_secs"),
    ("ATTEST_AGENT_PROBE_TIMEOUT_SECS", "agent.probe_timeout_secs"),
    ("ATTEST_SCHEMA_SAID", "signing.schema_said"),
    ("ATTEST_EXTENSION_THEME_URL", "signing.theme_url"),
    ("ATTEST_VERIFIER_URL", "verifier.url"),
    ("ATTEST_VERIFIER_TIMEOUT_SECS", "verifier.timeout_secs"),
    ("ATTEST_VERIFIER_MAX_RETRIES", "verifier.max_retries"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentSection {
    pub url: Option<String>,
    pub interaction_timeout_secs: Option<u64>,
    pub probe_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigningSection {
    pub schema_said: Option<String>,
    pub theme_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierSection {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// Merged configuration for all subcommands.
///
/// Parsing and validation belong to each crate's `from_lookup`; this type
/// only decides which source a setting comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub agent: AgentSection,
    pub signing: SigningSection,
    pub verifier: VerifierSection,
    /// Environment values, keyed by variable name.
    #[serde(skip)]
    overrides: BTreeMap<String, String>,
}

impl AppConfig {
    /// Load the YAML file (if any) and apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Record whatever `lookup` returns for each `ATTEST_*` variable.
    ///
    /// Blank values are ignored so the file value (or default) still applies.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (var, _) in SETTINGS {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                self.overrides.insert(var.to_string(), value);
            }
        }
    }

    /// The raw value of a setting by variable name: environment first,
    /// then the config file.
    pub fn setting(&self, var: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(var) {
            return Some(value.clone());
        }
        let number = |n: Option<u64>| n.map(|n| n.to_string());
        match var {
            "ATTEST_LOG_LEVEL" => self.log_level.clone(),
            "ATTEST_AGENT_URL" => self.agent.url.clone(),
            "ATTEST_AGENT_INTERACTION_TIMEOUT_SECS" => number(self.agent.interaction_timeout_secs),
            "ATTEST_AGENT_PROBE_TIMEOUT_SECS" => number(self.agent.probe_timeout_secs),
            "ATTEST_SCHEMA_SAID" => self.signing.schema_said.clone(),
            "ATTEST_EXTENSION_THEME_URL" => self.signing.theme_url.clone(),
            "ATTEST_VERIFIER_URL" => self.verifier.url.clone(),
            "ATTEST_VERIFIER_TIMEOUT_SECS" => number(self.verifier.timeout_secs),
            "ATTEST_VERIFIER_MAX_RETRIES" => self.verifier.max_retries.map(|n| n.to_string()),
            _ => None,
        }
    }

    pub fn log_level(&self) -> Option<String> {
        self.setting("ATTEST_LOG_LEVEL")
    }

    pub fn agent_config(&self) -> Result<AgentConfig> {
        AgentConfig::from_lookup(|var| self.setting(var)).map_err(|e| {
            let var = match &e {
                attest_gateway::ConfigError::Missing(var)
                | attest_gateway::ConfigError::Invalid(var, _) => *var,
            };
            with_source_hint(e, var)
        })
    }

    pub fn signing_config(&self) -> Result<SigningConfig> {
        SigningConfig::from_lookup(|var| self.setting(var)).map_err(|e| {
            let var = match &e {
                attest_workflow::ConfigError::Missing(var)
                | attest_workflow::ConfigError::Invalid(var, _) => *var,
            };
            with_source_hint(e, var)
        })
    }

    pub fn verifier_config(&self) -> Result<VerifierConfig> {
        VerifierConfig::from_lookup(|var| self.setting(var)).map_err(|e| {
            let var = match &e {
                attest_verifier::ConfigError::Missing(var)
                | attest_verifier::ConfigError::Invalid(var, _) => *var,
            };
            with_source_hint(e, var)
        })
    }
}

/// Wrap a config error with where the offending setting can be supplied.
fn with_source_hint<E>(err: E, var: &str) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    let hint = match SETTINGS.iter().find(|(env, _)| *env == var) {
        Some((env, key)) => format!("check {env} or `{key}` in the config file"),
        None => format!("check {var}"),
    };
    anyhow::Error::new(err).context(hint)
}
