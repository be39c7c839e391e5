// ABOUTME: Configuration values that are either literal or read from the environment.
// ABOUTME: Used for image tags, kubeconfig paths and other per-run settings.

use crate::error::{Error, Result};
use serde::Deserialize;

/// `tag: v1` or `tag: { env: IMAGE_TAG, default: latest }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn literal(value: impl Into<String>) -> Self {
        EnvValue::Literal(value.into())
    }

    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) if !val.is_empty() => Ok(val),
                _ => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}
