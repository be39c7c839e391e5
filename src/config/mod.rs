// ABOUTME: Configuration types and parsing for kubeform.yml.
// ABOUTME: Handles YAML parsing, validation, path resolution and stack overrides.

mod apply;
mod cluster;
mod deserialize;
mod env_value;
mod init;
mod service;
mod stages;

pub use apply::{ApplyConfig, ExposeConfig};
pub use cluster::{ClusterConfig, ClusterSpec, VpcCidr};
pub use env_value::EnvValue;
pub use init::init_config;
pub use service::ServiceEntry;
pub use stages::Stages;

use crate::error::{Error, Result};
use crate::types::{NamespaceName, RegistryUrl, ServiceName};
use deserialize::{
    deserialize_namespace, deserialize_namespace_option, deserialize_registry_url,
    deserialize_services,
};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "kubeform.yml";
pub const CONFIG_FILENAME_ALT: &str = "kubeform.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".kubeform/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_namespace")]
    pub namespace: NamespaceName,

    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub registry: Option<RegistryConfig>,

    #[serde(default = "default_services_root")]
    pub services_root: PathBuf,

    /// Directory inside each service holding the converted manifests.
    #[serde(default = "default_manifests_dir")]
    pub manifests_dir: PathBuf,

    #[serde(deserialize_with = "deserialize_services")]
    pub services: NonEmpty<ServiceEntry>,

    #[serde(default)]
    pub stages: Stages,

    #[serde(default)]
    pub expose: Option<ExposeConfig>,

    #[serde(default)]
    pub apply: ApplyConfig,

    #[serde(default)]
    pub stacks: HashMap<String, Stack>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(deserialize_with = "deserialize_registry_url")]
    pub url: RegistryUrl,

    #[serde(default = "default_tag")]
    pub tag: EnvValue,
}

fn default_tag() -> EnvValue {
    EnvValue::literal("latest")
}

/// Per-stack overrides merged over the base configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Stack {
    #[serde(default, deserialize_with = "deserialize_namespace_option")]
    pub namespace: Option<NamespaceName>,

    #[serde(default)]
    pub cluster: ClusterOverrides,

    #[serde(default)]
    pub registry: Option<RegistryConfig>,

    #[serde(default)]
    pub expose: Option<ExposeConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOverrides {
    pub min_cluster_size: Option<u32>,
    pub max_cluster_size: Option<u32>,
    pub desired_cluster_size: Option<u32>,
    pub node_instance_type: Option<String>,
    pub vpc_cidr: Option<String>,
    pub kubeconfig: Option<EnvValue>,
    pub vpc_id: Option<String>,
}

fn default_services_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_manifests_dir() -> PathBuf {
    PathBuf::from("kubernetes")
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = project_dir(path);
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Cross-field checks serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.cluster.spec()?;

        if self.stages.build_images
            && self.registry.is_none()
            && let Some(entry) = self.services.iter().find(|s| s.build && s.image.is_none())
        {
            return Err(Error::InvalidConfig(format!(
                "registry.url is required to build the image for service {}",
                entry.name
            )));
        }

        if let Some(ref expose) = self.expose
            && expose.marker.trim().is_empty()
        {
            return Err(Error::InvalidConfig(
                "expose.marker cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn for_stack(&self, name: &str) -> Result<Config> {
        let stack = self
            .stacks
            .get(name)
            .ok_or_else(|| Error::UnknownStack(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref namespace) = stack.namespace {
            merged.namespace = namespace.clone();
        }

        let o = &stack.cluster;
        let c = &mut merged.cluster;
        if let Some(v) = o.min_cluster_size {
            c.min_cluster_size = v;
        }
        if let Some(v) = o.max_cluster_size {
            c.max_cluster_size = v;
        }
        if let Some(v) = o.desired_cluster_size {
            c.desired_cluster_size = v;
        }
        if let Some(ref v) = o.node_instance_type {
            c.node_instance_type = v.clone();
        }
        if let Some(ref v) = o.vpc_cidr {
            c.vpc_cidr = v.clone();
        }
        if o.kubeconfig.is_some() {
            c.kubeconfig = o.kubeconfig.clone();
        }
        if o.vpc_id.is_some() {
            c.vpc_id = o.vpc_id.clone();
        }

        if stack.registry.is_some() {
            merged.registry = stack.registry.clone();
        }
        if stack.expose.is_some() {
            merged.expose = stack.expose.clone();
        }

        merged.validate()?;
        Ok(merged)
    }

    pub fn service_names(&self) -> Vec<ServiceName> {
        self.services.iter().map(|s| s.name.clone()).collect()
    }

    pub fn services_root(&self) -> PathBuf {
        self.base_dir.join(&self.services_root)
    }

    pub fn render_dir(&self) -> PathBuf {
        self.base_dir.join(&self.apply.render_dir)
    }

    pub fn template() -> Self {
        Config {
            namespace: NamespaceName::default(),
            cluster: ClusterConfig::default(),
            registry: None,
            services_root: default_services_root(),
            manifests_dir: default_manifests_dir(),
            services: NonEmpty::new(ServiceEntry::new(
                ServiceName::new("ui").expect("template service name is valid"),
            )),
            stages: Stages::default(),
            expose: None,
            apply: ApplyConfig::default(),
            stacks: HashMap::new(),
            base_dir: PathBuf::new(),
        }
    }
}

/// The directory a config file belongs to, skipping the `.kubeform` folder.
fn project_dir(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or_else(|| Path::new(""));
    if parent.file_name().is_some_and(|n| n == ".kubeform") {
        parent.parent().unwrap_or(parent).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}
