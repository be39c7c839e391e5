// ABOUTME: Settings for submitting manifests and exposing services.
// ABOUTME: Covers the kubectl binary, render directory, endpoint wait and expose rule.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyConfig {
    #[serde(default = "default_kubectl")]
    pub kubectl: String,

    /// Directory for `up --dry-run` output.
    #[serde(default = "default_render_dir")]
    pub render_dir: PathBuf,

    /// How long to wait for load balancer hostnames. Zero looks once.
    #[serde(default, with = "humantime_serde")]
    pub endpoint_timeout: Duration,
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

fn default_render_dir() -> PathBuf {
    PathBuf::from("rendered")
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            kubectl: default_kubectl(),
            render_dir: default_render_dir(),
            endpoint_timeout: Duration::ZERO,
        }
    }
}

/// Forces services whose name contains `marker` to an externally reachable type.
#[derive(Debug, Clone, Deserialize)]
pub struct ExposeConfig {
    pub marker: String,

    #[serde(default = "default_service_type", rename = "type")]
    pub service_type: String,
}

fn default_service_type() -> String {
    "LoadBalancer".to_string()
}
