// ABOUTME: Forces marked Services to an externally reachable type.
// ABOUTME: Applies to Services whose name contains the configured marker.

use super::Rule;
use crate::config::ExposeConfig;
use crate::manifest::{ManifestDocument, ResourceKind};

pub struct ServiceTypeOverride {
    marker: String,
    service_type: String,
}

impl ServiceTypeOverride {
    pub fn new(marker: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            service_type: service_type.into(),
        }
    }

    pub fn load_balancer(marker: impl Into<String>) -> Self {
        Self::new(marker, "LoadBalancer")
    }

    pub fn from_config(config: &ExposeConfig) -> Self {
        Self::new(config.marker.trim(), config.service_type.trim())
    }
}

impl Rule for ServiceTypeOverride {
    fn name(&self) -> &'static str {
        "service-type-override"
    }

    fn apply(&self, document: &mut ManifestDocument) -> bool {
        if document.kind() != ResourceKind::Service {
            return false;
        }
        let marked = document
            .name()
            .is_some_and(|name| name.contains(self.marker.as_str()));
        marked && document.set_service_type(&self.service_type)
    }
}
