// ABOUTME: Validated Kubernetes namespace names.
// ABOUTME: Enforces the RFC 1123 label rules the API server applies to namespaces.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NamespaceNameError {
    #[error("namespace cannot be empty")]
    Empty,

    #[error("namespace exceeds maximum length of 63 characters")]
    TooLong,

    #[error("invalid character in namespace: '{0}'")]
    InvalidChar(char),

    #[error("namespace must start and end with an alphanumeric character")]
    BadBoundary,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(String);

impl NamespaceName {
    pub fn new(value: &str) -> Result<Self, NamespaceNameError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(NamespaceNameError::Empty);
        }
        if trimmed.len() > 63 {
            return Err(NamespaceNameError::TooLong);
        }

        for c in trimmed.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(NamespaceNameError::InvalidChar(c));
            }
        }

        if trimmed.starts_with('-') || trimmed.ends_with('-') {
            return Err(NamespaceNameError::BadBoundary);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NamespaceName {
    fn default() -> Self {
        Self("app-namespace".to_string())
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
