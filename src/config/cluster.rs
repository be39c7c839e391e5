// ABOUTME: Managed cluster sizing and network settings.
// ABOUTME: Validates node-group bounds and the VPC CIDR before provisioning.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::net::Ipv4Addr;

use super::EnvValue;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default = "default_min_size")]
    pub min_cluster_size: u32,

    #[serde(default = "default_max_size")]
    pub max_cluster_size: u32,

    #[serde(default = "default_desired_size")]
    pub desired_cluster_size: u32,

    #[serde(default = "default_instance_type")]
    pub node_instance_type: String,

    #[serde(default = "default_vpc_cidr")]
    pub vpc_cidr: String,

    /// Kubeconfig of an already-provisioned cluster. Falls back to
    /// `KUBECONFIG`, then `~/.kube/config`.
    #[serde(default)]
    pub kubeconfig: Option<EnvValue>,

    #[serde(default)]
    pub vpc_id: Option<String>,
}

fn default_min_size() -> u32 {
    1
}

fn default_max_size() -> u32 {
    2
}

fn default_desired_size() -> u32 {
    2
}

fn default_instance_type() -> String {
    "t3.medium".to_string()
}

fn default_vpc_cidr() -> String {
    "10.0.0.0/16".to_string()
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: default_min_size(),
            max_cluster_size: default_max_size(),
            desired_cluster_size: default_desired_size(),
            node_instance_type: default_instance_type(),
            vpc_cidr: default_vpc_cidr(),
            kubeconfig: None,
            vpc_id: None,
        }
    }
}

impl ClusterConfig {
    /// Validate the settings into the `ClusterSpec` handed to the provisioner.
    pub fn spec(&self) -> Result<ClusterSpec> {
        let (min, desired, max) = (
            self.min_cluster_size,
            self.desired_cluster_size,
            self.max_cluster_size,
        );
        if min == 0 {
            return Err(Error::InvalidConfig(
                "cluster.minClusterSize must be at least 1".to_string(),
            ));
        }
        if !(min <= desired && desired <= max) {
            return Err(Error::InvalidConfig(format!(
                "cluster sizes must satisfy min <= desired <= max (got {min} <= {desired} <= {max})"
            )));
        }
        if self.node_instance_type.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "cluster.nodeInstanceType cannot be empty".to_string(),
            ));
        }

        Ok(ClusterSpec {
            min_size: min,
            max_size: max,
            desired_size: desired,
            node_instance_type: self.node_instance_type.trim().to_string(),
            vpc_cidr: VpcCidr::parse(&self.vpc_cidr)?,
        })
    }
}

/// Validated cluster parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    pub min_size: u32,
    pub max_size: u32,
    pub desired_size: u32,
    pub node_instance_type: String,
    pub vpc_cidr: VpcCidr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VpcCidr {
    pub network: Ipv4Addr,
    pub prefix: u8,
}

impl VpcCidr {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidConfig(format!("invalid vpcCidr: {input}"));
        let (addr, prefix) = input.trim().split_once('/').ok_or_else(invalid)?;
        let network: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        if prefix > 32 {
            return Err(invalid());
        }
        Ok(Self { network, prefix })
    }
}

impl fmt::Display for VpcCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_valid_spec() {
        let spec = ClusterConfig::default().spec().unwrap();
        assert_eq!(spec.min_size, 1);
        assert_eq!(spec.desired_size, 2);
        assert_eq!(spec.max_size, 2);
        assert_eq!(spec.node_instance_type, "t3.medium");
        assert_eq!(spec.vpc_cidr.to_string(), "10.0.0.0/16");
    }

    #[test]
    fn desired_above_max_is_rejected() {
        let config = ClusterConfig {
            desired_cluster_size: 5,
            ..ClusterConfig::default()
        };
        let err = config.spec().unwrap_err();
        assert!(err.to_string().contains("min <= desired <= max"));
    }

    #[test]
    fn zero_min_is_rejected() {
        let config = ClusterConfig {
            min_cluster_size: 0,
            ..ClusterConfig::default()
        };
        assert!(config.spec().is_err());
    }

    #[test]
    fn cidr_parsing() {
        assert!(VpcCidr::parse("10.1.0.0/20").is_ok());
        assert!(VpcCidr::parse("10.1.0.0").is_err());
        assert!(VpcCidr::parse("10.1.0.0/33").is_err());
        assert!(VpcCidr::parse("not-a-cidr/16").is_err());
    }
}
