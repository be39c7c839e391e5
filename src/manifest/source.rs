// ABOUTME: Locates each service's directory of converted manifest files.
// ABOUTME: A missing directory is a reportable condition, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::types::ServiceName;

const MANIFEST_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Resolves `<services_root>/<service>/<manifests_dir>/*.yaml|*.yml`.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    services_root: PathBuf,
    manifests_dir: PathBuf,
}

impl ManifestSource {
    pub fn new(services_root: impl Into<PathBuf>, manifests_dir: impl Into<PathBuf>) -> Self {
        Self {
            services_root: services_root.into(),
            manifests_dir: manifests_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.services_root(), &config.manifests_dir)
    }

    pub fn services_root(&self) -> &Path {
        &self.services_root
    }

    pub fn directory(&self, service: &ServiceName) -> PathBuf {
        self.services_root
            .join(service.as_str())
            .join(&self.manifests_dir)
    }

    /// Manifest files for a service, sorted by path. Empty when the directory
    /// is absent, unreadable or holds no YAML files.
    ///
    /// Lists the directory synchronously; file contents are read with
    /// [`decode_file`](super::decode_file).
    pub fn resolve(&self, service: &ServiceName) -> Vec<PathBuf> {
        let dir = self.directory(service);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("No manifest directory for {}: {}: {}", service, dir.display(), e);
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_manifest_file(path))
            .collect();
        files.sort();
        files
    }

    /// Presence of manifests for every service, logged as it is built.
    pub fn report(&self, services: &[ServiceName]) -> PresenceReport {
        let entries = services
            .iter()
            .map(|service| {
                let directory = self.directory(service);
                let files = self.resolve(service).len();
                if files > 0 {
                    tracing::info!(
                        "Found {} manifest file(s) for {} in {}",
                        files,
                        service,
                        directory.display()
                    );
                } else {
                    tracing::warn!("No manifests for {} in {}", service, directory.display());
                }
                PresenceEntry {
                    service: service.clone(),
                    directory,
                    files,
                }
            })
            .collect();

        PresenceReport { entries }
    }
}

fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

#[derive(Debug, Clone)]
pub struct PresenceEntry {
    pub service: ServiceName,
    pub directory: PathBuf,
    pub files: usize,
}

impl PresenceEntry {
    pub fn found(&self) -> bool {
        self.files > 0
    }

    pub fn line(&self) -> String {
        if self.found() {
            format!(
                "  ✓ {}: {} file(s) in {}",
                self.service,
                self.files,
                self.directory.display()
            )
        } else {
            format!("  ✗ {}: not found ({})", self.service, self.directory.display())
        }
    }
}

/// Pre-flight view of which services have usable manifests.
#[derive(Debug, Clone, Default)]
pub struct PresenceReport {
    entries: Vec<PresenceEntry>,
}

impl PresenceReport {
    pub fn entries(&self) -> &[PresenceEntry] {
        &self.entries
    }

    pub fn found(&self) -> impl Iterator<Item = &PresenceEntry> {
        self.entries.iter().filter(|e| e.found())
    }

    pub fn missing(&self) -> impl Iterator<Item = &PresenceEntry> {
        self.entries.iter().filter(|e| !e.found())
    }

    /// True when no service has any manifest file.
    pub fn none_found(&self) -> bool {
        self.found().next().is_none()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(PresenceEntry::line).collect()
    }
}
