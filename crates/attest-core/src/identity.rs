//! # Identifier Newtypes
//!
//! Self-addressing identifiers (SAIDs) name credentials and credential
//! schemas. Keeping them in distinct types means a schema identifier can
//! never be passed where a credential identifier is expected.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

fn validate_said(kind: &'static str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::InvalidIdentifier {
            kind,
            reason: "must not be empty".into(),
        });
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CoreError::InvalidIdentifier {
            kind,
            reason: format!("character {c:?} is outside the URL-safe base64 alphabet"),
        });
    }
    Ok(())
}

/// Self-addressing identifier of an issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Said(String);

impl Said {
    /// Validate and wrap a credential SAID.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        validate_said("SAID", &value)?;
        Ok(Self(value))
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Self-addressing identifier of a credential schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaSaid(String);

impl SchemaSaid {
    /// Validate and wrap a schema SAID.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        validate_said("schema SAID", &value)?;
        Ok(Self(value))
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Said {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for SchemaSaid {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Said> for String {
    fn from(value: Said) -> Self {
        value.0
    }
}

impl From<SchemaSaid> for String {
    fn from(value: SchemaSaid) -> Self {
        value.0
    }
}

impl std::fmt::Display for Said {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for SchemaSaid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
