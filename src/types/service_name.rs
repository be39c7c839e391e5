// ABOUTME: Logical service identifiers validated as DNS labels.
// ABOUTME: Also owns the image-name matching rule used for reference rewriting.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceNameError {
    #[error("service name cannot be empty")]
    Empty,

    #[error("service name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("service name must start and end with an alphanumeric character")]
    BadBoundary,

    #[error("service name must be lowercase")]
    NotLowercase,

    #[error("invalid character in service name: '{0}'")]
    InvalidChar(char),
}

/// Identifier of one deployable workload unit (e.g. `cart`, `ui`).
///
/// Names follow RFC 1123 label rules so they can double as directory names,
/// image repository names and Kubernetes object names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, ServiceNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ServiceNameError::Empty);
        }

        if value.len() > 63 {
            return Err(ServiceNameError::TooLong);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(ServiceNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(ServiceNameError::InvalidChar(c));
            }
        }

        if value.starts_with('-') || value.ends_with('-') {
            return Err(ServiceNameError::BadBoundary);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a container `image` field refers to this service.
    ///
    /// Matches the bare name (`cart`) or the name with any tag (`cart:local`).
    /// Registry-qualified references never match.
    pub fn matches_image(&self, image: &str) -> bool {
        match image.strip_prefix(self.0.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with(':'),
            None => false,
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_bare_and_tagged_names() {
        let cart = ServiceName::new("cart").unwrap();
        assert!(cart.matches_image("cart"));
        assert!(cart.matches_image("cart:local"));
        assert!(cart.matches_image("cart:"));
    }

    #[test]
    fn rejects_lookalike_images() {
        let cart = ServiceName::new("cart").unwrap();
        assert!(!cart.matches_image("carts"));
        assert!(!cart.matches_image("cart-db:1"));
        assert!(!cart.matches_image("registry/cart:abc"));
        assert!(!cart.matches_image(""));
    }
}
