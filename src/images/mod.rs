// ABOUTME: The image reference table: service name to pushed image reference.
// ABOUTME: Built once from completed builds and read-only afterwards.

use std::fmt;
use thiserror::Error;

use crate::types::{ImageRef, ServiceName};

#[derive(Debug, Error)]
pub enum ImageTableError {
    #[error("no built image for service {0}; every expected build must resolve")]
    MissingImage(ServiceName),
}

/// The resolved image of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub service: ServiceName,
    pub image: ImageRef,
}

impl BuildOutcome {
    pub fn new(service: ServiceName, image: ImageRef) -> Self {
        Self { service, image }
    }
}

/// Ordered mapping from service to resolved image reference.
///
/// Lookups scan entries in insertion order, so the first matching service wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTable {
    entries: Vec<(ServiceName, ImageRef)>,
}

impl ImageTable {
    /// Build the table from build outcomes.
    ///
    /// The result follows the order of `expected`. Every expected service must
    /// have an outcome; extra outcomes are ignored.
    pub fn from_builds(
        expected: &[ServiceName],
        outcomes: Vec<BuildOutcome>,
    ) -> Result<Self, ImageTableError> {
        let mut entries = Vec::with_capacity(expected.len());

        for service in expected {
            let outcome = outcomes
                .iter()
                .find(|o| &o.service == service)
                .ok_or_else(|| ImageTableError::MissingImage(service.clone()))?;
            entries.push((service.clone(), outcome.image.clone()));
        }

        for outcome in &outcomes {
            if !expected.contains(&outcome.service) {
                tracing::debug!("Ignoring image for unexpected service {}", outcome.service);
            }
        }

        Ok(Self { entries })
    }

    /// Find the service an `image` field refers to and its resolved reference.
    pub fn lookup(&self, image: &str) -> Option<(&ServiceName, &ImageRef)> {
        self.entries
            .iter()
            .find(|(service, _)| service.matches_image(image))
            .map(|(service, image)| (service, image))
    }

    pub fn get(&self, service: &ServiceName) -> Option<&ImageRef> {
        self.entries
            .iter()
            .find(|(s, _)| s == service)
            .map(|(_, image)| image)
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceName> {
        self.entries.iter().map(|(s, _)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ServiceName, &ImageRef)> {
        self.entries.iter().map(|(s, i)| (s, i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ImageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (service, image) in &self.entries {
            writeln!(f, "{service} -> {image}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(name: &str) -> ServiceName {
        ServiceName::new(name).unwrap()
    }

    fn outcome(name: &str, image: &str) -> BuildOutcome {
        BuildOutcome::new(svc(name), ImageRef::parse(image).unwrap())
    }

    #[test]
    fn missing_expected_build_is_fatal() {
        let err = ImageTable::from_builds(
            &[svc("cart"), svc("ui")],
            vec![outcome("cart", "registry.local/cart:abc")],
        )
        .unwrap_err();
        assert!(matches!(err, ImageTableError::MissingImage(ref s) if s.as_str() == "ui"));
    }

    #[test]
    fn follows_expected_order_and_ignores_extras() {
        let table = ImageTable::from_builds(
            &[svc("ui"), svc("cart")],
            vec![
                outcome("cart", "registry.local/cart:abc"),
                outcome("orders", "registry.local/orders:1"),
                outcome("ui", "registry.local/ui:def"),
            ],
        )
        .unwrap();
        let order: Vec<&str> = table.services().map(|s| s.as_str()).collect();
        assert_eq!(order, vec!["ui", "cart"]);
        assert!(table.get(&svc("orders")).is_none());
    }

    #[test]
    fn lookup_matches_exact_and_tagged_names() {
        let table = ImageTable::from_builds(
            &[svc("cart")],
            vec![outcome("cart", "registry.local/cart:abc")],
        )
        .unwrap();

        assert!(table.lookup("cart").is_some());
        assert!(table.lookup("cart:local").is_some());
        assert!(table.lookup("catalog:local").is_none());
    }
}
