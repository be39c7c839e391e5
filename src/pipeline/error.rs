// ABOUTME: Pipeline error type with SNAFU context selectors.
// ABOUTME: Classifies failures by stage for programmatic handling.

use snafu::Snafu;
use std::path::PathBuf;

use crate::deploy::DeployError;
use crate::images::ImageTableError;
use crate::provider::{ApplyError, BuildError, ClusterError};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    #[snafu(display("invalid configuration: {message}"))]
    Config { message: String },

    #[snafu(display("cluster provisioning failed: {source}"))]
    Provision { source: ClusterError },

    #[snafu(display("image build failed: {source}"))]
    Build { source: BuildError },

    #[snafu(display("image table incomplete: {source}"))]
    Images { source: ImageTableError },

    #[snafu(display("namespace creation failed: {source}"))]
    Namespace { source: ApplyError },

    #[snafu(display("no manifests found for any service under {}", root.display()))]
    NoManifests { root: PathBuf },

    #[snafu(display("{source}"))]
    Deploy { source: DeployError },

    #[snafu(display("failed to read exports: {source}"))]
    Export { source: ApplyError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    /// Bad configuration or missing inputs; fix and re-run.
    Configuration,
    Provisioning,
    ImageBuild,
    /// The applier rejected a namespace or unit.
    Deployment,
    Export,
}

impl PipelineError {
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::Config { .. }
            | PipelineError::Images { .. }
            | PipelineError::NoManifests { .. }
            | PipelineError::Deploy {
                source: DeployError::NoManifests { .. } | DeployError::Decode { .. },
            } => PipelineErrorKind::Configuration,
            PipelineError::Provision { .. } => PipelineErrorKind::Provisioning,
            PipelineError::Build { .. } => PipelineErrorKind::ImageBuild,
            PipelineError::Namespace { .. } | PipelineError::Deploy { .. } => {
                PipelineErrorKind::Deployment
            }
            PipelineError::Export { .. } => PipelineErrorKind::Export,
        }
    }
}
