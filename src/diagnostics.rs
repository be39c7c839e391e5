// ABOUTME: Diagnostics accumulator for non-fatal warnings during a run.
// ABOUTME: Skipped services and pending endpoints are shown but never fail the run.

use crate::types::ServiceName;

/// Collects non-fatal warnings during a pipeline run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn manifests_missing(service: &ServiceName) -> Self {
        Self {
            kind: WarningKind::ManifestsMissing,
            message: format!("{service} skipped: no manifests found"),
        }
    }

    pub fn endpoint_pending(service: &str) -> Self {
        Self {
            kind: WarningKind::EndpointPending,
            message: format!("load balancer for {service} has no external address yet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A service had no manifests and was skipped.
    ManifestsMissing,
    /// A load balancer had not been assigned an address.
    EndpointPending,
}
