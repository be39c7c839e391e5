// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates kubeform.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{RegistryUrl, ServiceName};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    services: &[String],
    registry: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let names = if services.is_empty() {
        Config::template().service_names()
    } else {
        services
            .iter()
            .map(|s| ServiceName::new(s).map_err(|e| Error::InvalidConfig(e.to_string())))
            .collect::<Result<Vec<_>>>()?
    };

    let registry = registry
        .map(RegistryUrl::new)
        .transpose()
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let yaml = generate_template_yaml(&Config::template(), &names, registry.as_ref());
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(
    config: &Config,
    services: &[ServiceName],
    registry: Option<&RegistryUrl>,
) -> String {
    let services_yaml: String = services.iter().map(|s| format!("  - {s}\n")).collect();
    let registry_url = registry
        .map(|r| r.to_string())
        .unwrap_or_else(|| "123456789012.dkr.ecr.us-east-1.amazonaws.com/app".to_string());
    let cluster = &config.cluster;

    format!(
        r#"namespace: {}

cluster:
  minClusterSize: {}
  maxClusterSize: {}
  desiredClusterSize: {}
  nodeInstanceType: {}
  vpcCidr: {}
  # kubeconfig: ~/.kube/config

registry:
  url: {}
  tag:
    env: IMAGE_TAG
    default: latest

services_root: {}
manifests_dir: {}

services:
{}
# Expose services whose name contains the marker through a load balancer.
# expose:
#   marker: ui
"#,
        config.namespace,
        cluster.min_cluster_size,
        cluster.max_cluster_size,
        cluster.desired_cluster_size,
        cluster.node_instance_type,
        cluster.vpc_cidr,
        registry_url,
        config.services_root.display(),
        config.manifests_dir.display(),
        services_yaml,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_template_parses() {
        let names = vec![
            ServiceName::new("cart").unwrap(),
            ServiceName::new("ui").unwrap(),
        ];
        let yaml = generate_template_yaml(&Config::template(), &names, None);
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.namespace.as_str(), "app-namespace");
        assert!(config.registry.is_some());
    }
}
