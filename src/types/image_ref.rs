// ABOUTME: Container image reference parsing and registry-qualified construction.
// ABOUTME: Handles nginx, nginx:tag, registry/org/image:tag@digest and registry URLs.

use std::fmt;
use thiserror::Error;

use super::ServiceName;

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

fn check_chars(input: &str, extra: &[char]) -> Result<(), ParseImageRefError> {
    for c in input.chars() {
        if !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_') && !extra.contains(&c)
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }
    }
    Ok(())
}

/// A fully-qualified reference to a pushed image, e.g.
/// `123456789012.dkr.ecr.us-east-1.amazonaws.com/retail/cart:3f2a1c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: Option<String>,
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }
        check_chars(input, &['@'])?;

        let (without_digest, digest) = match input.split_once('@') {
            Some((before, after)) if !after.is_empty() => (before, Some(after.to_string())),
            Some(_) => return Err(ParseImageRefError::InvalidFormat(input.to_string())),
            None => (input, None),
        };

        // A colon followed by a slash belongs to a registry port, not a tag.
        let (without_tag, tag) = match without_digest.rsplit_once(':') {
            Some((_, after)) if after.contains('/') => (without_digest, None),
            Some((_, "")) => return Err(ParseImageRefError::InvalidFormat(input.to_string())),
            Some((before, after)) => (before, Some(after.to_string())),
            None => (without_digest, None),
        };

        let (registry, name) = split_registry(without_tag)?;

        let tag = match (&tag, &digest) {
            (None, None) => Some("latest".to_string()),
            _ => tag,
        };

        Ok(Self {
            registry,
            name,
            tag,
            digest,
        })
    }

    /// Reference for a service's image inside a registry repository prefix.
    pub fn in_registry(
        registry: &RegistryUrl,
        service: &ServiceName,
        tag: &str,
    ) -> Result<Self, ParseImageRefError> {
        Self::parse(&format!("{}/{}:{}", registry, service, tag))
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }
}

fn split_registry(input: &str) -> Result<(Option<String>, String), ParseImageRefError> {
    if input.is_empty() || input.starts_with('/') || input.ends_with('/') || input.contains("//")
    {
        return Err(ParseImageRefError::InvalidFormat(input.to_string()));
    }

    // The first component is a registry host when it looks like one.
    match input.split_once('/') {
        Some((first, rest))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            Ok((Some(first.to_string()), rest.to_string()))
        }
        _ => Ok((None, input.to_string())),
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref registry) = self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

/// Registry repository prefix images are pushed under, without scheme or
/// trailing slash (e.g. `123456789012.dkr.ecr.us-east-1.amazonaws.com/retail`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUrl(String);

impl RegistryUrl {
    pub fn new(value: &str) -> Result<Self, ParseImageRefError> {
        let trimmed = value.trim();
        let trimmed = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed)
            .trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ParseImageRefError::Empty);
        }
        check_chars(trimmed, &[])?;
        if trimmed.starts_with('/') || trimmed.contains("//") {
            return Err(ParseImageRefError::InvalidFormat(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
