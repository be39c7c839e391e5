// ABOUTME: One decoded Kubernetes-style resource as an untyped YAML mapping.
// ABOUTME: Accessors cover kind, metadata, service type and pod container lists.

use serde_yaml::{Mapping, Value};

use super::ResourceKind;

const CONTAINER_LISTS: [&str; 2] = ["containers", "initContainers"];

/// A manifest document whose root is a mapping.
///
/// Everything outside the fields the rewrite rules touch is carried through
/// untouched, including key order.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Mapping,
}

impl ManifestDocument {
    pub fn new(root: Mapping) -> Self {
        Self { root }
    }

    /// Wrap a decoded value. Returns `None` unless the value is a mapping.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Mapping(root) => Some(Self { root }),
            _ => None,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Option<Self>, serde_yaml::Error> {
        serde_yaml::from_str::<Value>(yaml).map(Self::from_value)
    }

    pub fn kind(&self) -> ResourceKind {
        ResourceKind::parse(self.root.get("kind").and_then(Value::as_str).unwrap_or(""))
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata()?.get("name")?.as_str()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata()?.get("namespace")?.as_str()
    }

    /// Set `metadata.namespace`, creating `metadata` when absent.
    /// Returns whether the document changed.
    pub fn set_namespace(&mut self, namespace: &str) -> bool {
        if self.namespace() == Some(namespace) {
            return false;
        }
        match child_mapping(&mut self.root, "metadata") {
            Some(metadata) => {
                metadata.insert(Value::from("namespace"), Value::from(namespace));
                true
            }
            None => {
                tracing::warn!(
                    "{} {} has non-mapping metadata; namespace {} not set",
                    self.kind(),
                    self.name().unwrap_or("<unnamed>"),
                    namespace
                );
                false
            }
        }
    }

    pub fn service_type(&self) -> Option<&str> {
        self.root.get("spec")?.as_mapping()?.get("type")?.as_str()
    }

    /// Set `spec.type`, creating `spec` when absent.
    pub fn set_service_type(&mut self, service_type: &str) -> bool {
        if self.service_type() == Some(service_type) {
            return false;
        }
        match child_mapping(&mut self.root, "spec") {
            Some(spec) => {
                spec.insert(Value::from("type"), Value::from(service_type));
                true
            }
            None => false,
        }
    }

    /// Containers and init containers of the pod template, if the kind has one.
    pub fn containers_mut(&mut self) -> Vec<&mut Mapping> {
        let Some(path) = self.kind().pod_spec_path() else {
            return Vec::new();
        };
        let Some(pod_spec) = mapping_at_mut(&mut self.root, path) else {
            return Vec::new();
        };

        pod_spec
            .iter_mut()
            .filter(|(key, _)| key.as_str().is_some_and(|k| CONTAINER_LISTS.contains(&k)))
            .filter_map(|(_, list)| list.as_sequence_mut())
            .flat_map(|seq| seq.iter_mut())
            .filter_map(Value::as_mapping_mut)
            .collect()
    }

    /// Image strings of every container, in document order.
    pub fn container_images(&self) -> Vec<&str> {
        let Some(path) = self.kind().pod_spec_path() else {
            return Vec::new();
        };
        let Some(pod_spec) = mapping_at(&self.root, path) else {
            return Vec::new();
        };

        CONTAINER_LISTS
            .iter()
            .filter_map(|key| pod_spec.get(*key)?.as_sequence())
            .flatten()
            .filter_map(|c| c.as_mapping()?.get("image")?.as_str())
            .collect()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.root)
    }

    fn metadata(&self) -> Option<&Mapping> {
        self.root.get("metadata")?.as_mapping()
    }
}

fn mapping_at<'a>(root: &'a Mapping, path: &[&str]) -> Option<&'a Mapping> {
    path.iter()
        .try_fold(root, |current, key| current.get(*key)?.as_mapping())
}

fn mapping_at_mut<'a>(root: &'a mut Mapping, path: &[&str]) -> Option<&'a mut Mapping> {
    let mut current = root;
    for key in path {
        current = current.get_mut(*key)?.as_mapping_mut()?;
    }
    Some(current)
}

/// The mapping under `key`, inserted empty when missing or null. `None` when
/// the key holds a scalar or sequence.
fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    let slot = parent.entry(Value::from(key)).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Mapping(Mapping::new());
    }
    slot.as_mapping_mut()
}
