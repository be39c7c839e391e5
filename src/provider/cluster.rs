// ABOUTME: Cluster provisioning contract and the existing-cluster adapter.
// ABOUTME: Provisioning yields the kubeconfig and the VPC identifier.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::{ClusterConfig, ClusterSpec};
use crate::types::VpcId;

/// What a provisioned cluster hands to later stages.
#[derive(Debug, Clone, Default)]
pub struct ClusterOutputs {
    pub kubeconfig: String,
    pub kubeconfig_path: Option<PathBuf>,
    pub vpc_id: Option<VpcId>,
}

#[async_trait]
pub trait ClusterProvisioner: Send + Sync {
    /// Create or update the cluster described by `spec`.
    async fn provision(&self, spec: &ClusterSpec) -> Result<ClusterOutputs, ClusterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("no kubeconfig configured and neither KUBECONFIG nor HOME is set")]
    NoKubeconfig,

    #[error("failed to read kubeconfig {}: {source}", .path.display())]
    Kubeconfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid cluster configuration: {0}")]
    InvalidConfig(String),
}

/// Attaches to a cluster that was provisioned out of band.
///
/// Node-group sizing in the cluster spec is not applied; it is logged so operators can
/// compare it with the live cluster.
#[derive(Debug, Clone)]
pub struct ExistingCluster {
    kubeconfig: PathBuf,
    vpc_id: Option<VpcId>,
}

impl ExistingCluster {
    pub fn new(kubeconfig: impl Into<PathBuf>, vpc_id: Option<VpcId>) -> Self {
        Self {
            kubeconfig: kubeconfig.into(),
            vpc_id,
        }
    }

    /// Resolve the kubeconfig from config, then `KUBECONFIG`, then `~/.kube/config`.
    pub fn from_config(config: &ClusterConfig, base_dir: &Path) -> Result<Self, ClusterError> {
        let configured = config
            .kubeconfig
            .as_ref()
            .map(|value| value.resolve())
            .transpose()
            .map_err(|e| ClusterError::InvalidConfig(e.to_string()))?;

        let path = match configured {
            Some(path) => expand_home(&path).map(|p| base_dir.join(p)),
            None => std::env::var("KUBECONFIG")
                .ok()
                .filter(|v| !v.is_empty())
                // KUBECONFIG may list several files; the first one wins here.
                .and_then(|v| v.split(':').next().map(PathBuf::from))
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|home| PathBuf::from(home).join(".kube").join("config"))
                }),
        }
        .ok_or(ClusterError::NoKubeconfig)?;

        Ok(Self::new(path, config.vpc_id.clone().map(VpcId::new)))
    }

    pub fn kubeconfig_path(&self) -> &Path {
        &self.kubeconfig
    }
}

fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

#[async_trait]
impl ClusterProvisioner for ExistingCluster {
    async fn provision(&self, spec: &ClusterSpec) -> Result<ClusterOutputs, ClusterError> {
        tracing::info!(
            "Using existing cluster from {} (requested {} x {}, {}..{} nodes, VPC {})",
            self.kubeconfig.display(),
            spec.desired_size,
            spec.node_instance_type,
            spec.min_size,
            spec.max_size,
            spec.vpc_cidr
        );

        let kubeconfig = tokio::fs::read_to_string(&self.kubeconfig)
            .await
            .map_err(|source| ClusterError::Kubeconfig {
                path: self.kubeconfig.clone(),
                source,
            })?;

        Ok(ClusterOutputs {
            kubeconfig,
            kubeconfig_path: Some(self.kubeconfig.clone()),
            vpc_id: self.vpc_id.clone(),
        })
    }
}
