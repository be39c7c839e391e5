// ABOUTME: Pipeline state types for the type state pattern.
// ABOUTME: Each state carries the outputs later stages depend on.

use std::sync::Arc;

use crate::deploy::{Dependency, DeploymentSummary};
use crate::images::ImageTable;
use crate::provider::ClusterOutputs;

/// Configuration validated. Available actions: `provision()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Configured;

/// Cluster available (or provisioning disabled).
/// Available actions: `resolve_images()`
#[derive(Debug, Clone, Default)]
pub struct Provisioned {
    pub(crate) cluster: Option<ClusterOutputs>,
}

/// Every expected image resolved into a concrete table.
/// Available actions: `verify()`, `deploy()`
#[derive(Debug, Clone)]
pub struct ImagesResolved {
    pub(crate) cluster: Option<ClusterOutputs>,
    pub(crate) table: Arc<ImageTable>,
    pub(crate) builds: Vec<Dependency>,
}

/// Units submitted (or deployment disabled).
/// Available actions: `exports()`
#[derive(Debug, Clone)]
pub struct Deployed {
    pub(crate) cluster: Option<ClusterOutputs>,
    pub(crate) summary: Option<DeploymentSummary>,
}
