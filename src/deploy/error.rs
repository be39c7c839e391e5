// ABOUTME: Error types for deployment orchestration.
// ABOUTME: Decode and apply failures are fatal for their unit; no manifests at all is fatal for the run.

use std::path::PathBuf;

use crate::manifest::DecodeError;
use crate::provider::ApplyError;
use crate::types::ServiceName;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A manifest file of the service could not be decoded.
    #[error("failed to load manifests for {service}: {source}")]
    Decode {
        service: ServiceName,
        source: DecodeError,
    },

    /// The applier rejected the service's unit.
    #[error("failed to apply {service}: {source}")]
    Apply {
        service: ServiceName,
        source: ApplyError,
    },

    /// No service had any usable manifest.
    #[error("no manifests found for any service under {}", .root.display())]
    NoManifests { root: PathBuf },
}

impl DeployError {
    pub fn service(&self) -> Option<&ServiceName> {
        match self {
            DeployError::Decode { service, .. } | DeployError::Apply { service, .. } => {
                Some(service)
            }
            DeployError::NoManifests { .. } => None,
        }
    }
}
