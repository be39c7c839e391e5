// ABOUTME: Declarative apply contract: namespaces, deployment units and endpoints.
// ABOUTME: The applier owns real execution order, derived from declared dependencies.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::deploy::DeploymentUnit;
use crate::types::NamespaceName;

#[async_trait]
pub trait Applier: Send + Sync {
    /// Create the namespace if it does not exist.
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), ApplyError>;

    /// Submit every document of a unit as one group.
    async fn apply(&self, unit: &DeploymentUnit) -> Result<(), ApplyError>;

    /// External endpoint of a load-balanced Service, once one is assigned.
    async fn endpoint(
        &self,
        namespace: &NamespaceName,
        service: &str,
    ) -> Result<Option<Endpoint>, ApplyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{target} rejected: {message}")]
    Rejected { target: String, message: String },

    #[error("failed to encode {target}: {source}")]
    Encode {
        target: String,
        source: serde_yaml::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unexpected status for service {service}: {source}")]
    Status {
        service: String,
        source: serde_json::Error,
    },
}

/// One entry of `status.loadBalancer.ingress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoadBalancerIngress {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Hostname(String),
    Ip(String),
}

impl Endpoint {
    /// The first ingress's hostname, else its IP.
    pub fn from_ingress(ingress: &[LoadBalancerIngress]) -> Option<Self> {
        let first = ingress.first()?;
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        non_empty(&first.hostname)
            .map(Endpoint::Hostname)
            .or_else(|| non_empty(&first.ip).map(Endpoint::Ip))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Endpoint::Hostname(s) | Endpoint::Ip(s) => s,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
