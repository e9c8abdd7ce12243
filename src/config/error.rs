//! Configuration errors
//!
//! Validation never stops at the first problem: every violation found in one
//! pass is collected into [`ValidationErrors`] and surfaced as a single
//! [`ConfigError::Invalid`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Every violation found while validating one raw configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    /// Problems not tied to a single field (e.g. the root is not an object)
    pub form_errors: Vec<String>,

    /// Field path -> messages for that field
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    /// Total number of messages
    pub fn len(&self) -> usize {
        self.form_errors.len() + self.field_errors.values().map(Vec::len).sum::<usize>()
    }

    pub fn push_form(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    pub fn push_field(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for `path`
    pub fn field(&self, path: &str) -> Option<&[String]> {
        self.field_errors.get(path).map(Vec::as_slice)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.form_errors {
            writeln!(f, "  - {}", message)?;
        }
        for (path, messages) in &self.field_errors {
            writeln!(f, "  - {}: {}", path, messages.join("; "))?;
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid site graph configuration:\n{0}")]
    Invalid(ValidationErrors),
}

impl ConfigError {
    /// The collected violations, when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ConfigError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
