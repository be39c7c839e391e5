// ABOUTME: Optional pipeline stages toggled from configuration.
// ABOUTME: Cluster-only, build-only and full deploy runs share one pipeline.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Stages {
    #[serde(default = "enabled")]
    pub provision: bool,

    #[serde(default = "enabled")]
    pub build_images: bool,

    /// Rewrite image references, namespaces and service types.
    #[serde(default = "enabled")]
    pub transform: bool,

    /// Print the manifest presence report before deploying.
    #[serde(default = "enabled")]
    pub validate: bool,

    #[serde(default = "enabled")]
    pub deploy: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            provision: true,
            build_images: true,
            transform: true,
            validate: true,
            deploy: true,
        }
    }
}
