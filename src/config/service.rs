// ABOUTME: Per-service entries from the services list.
// ABOUTME: Accepts bare names or detailed entries with build context and prebuilt images.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{ImageRef, ServiceName};

/// One logical service and how its image is obtained.
#[derive(Debug, Clone)]
pub struct ServiceEntry {
    pub name: ServiceName,
    /// Build context; defaults to `<services_root>/<name>`.
    pub context: Option<PathBuf>,
    pub dockerfile: Option<String>,
    /// Prebuilt image used as-is instead of building.
    pub image: Option<ImageRef>,
    /// Whether an image is built for this service.
    pub build: bool,
}

impl ServiceEntry {
    pub fn new(name: ServiceName) -> Self {
        Self {
            name,
            context: None,
            dockerfile: None,
            image: None,
            build: true,
        }
    }

    pub fn context_dir(&self, services_root: &Path) -> PathBuf {
        self.context
            .clone()
            .unwrap_or_else(|| services_root.join(self.name.as_str()))
    }

    pub fn dockerfile_name(&self) -> &str {
        self.dockerfile.as_deref().unwrap_or("Dockerfile")
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ServiceEntryRaw {
    Simple(String),
    Detailed {
        name: String,
        #[serde(default)]
        context: Option<PathBuf>,
        #[serde(default)]
        dockerfile: Option<String>,
        #[serde(default)]
        image: Option<String>,
        #[serde(default = "default_build")]
        build: bool,
    },
}

fn default_build() -> bool {
    true
}

impl ServiceEntryRaw {
    pub(super) fn into_entry(self) -> Result<ServiceEntry, String> {
        match self {
            ServiceEntryRaw::Simple(name) => ServiceName::new(&name)
                .map(ServiceEntry::new)
                .map_err(|e| e.to_string()),
            ServiceEntryRaw::Detailed {
                name,
                context,
                dockerfile,
                image,
                build,
            } => {
                let name = ServiceName::new(&name).map_err(|e| e.to_string())?;
                let image = image
                    .map(|i| ImageRef::parse(&i))
                    .transpose()
                    .map_err(|e| format!("service {name}: {e}"))?;
                Ok(ServiceEntry {
                    name,
                    context,
                    dockerfile,
                    image,
                    build,
                })
            }
        }
    }
}
