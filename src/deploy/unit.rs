// ABOUTME: A deployment unit: one service's documents plus declared dependencies.
// ABOUTME: Dependencies name the namespace and every image build the unit waits on.

use std::fmt;

use crate::manifest::{ManifestDocument, ResourceKind};
use crate::types::{NamespaceName, ServiceName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    Namespace(NamespaceName),
    ImageBuild(ServiceName),
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Namespace(ns) => write!(f, "namespace/{ns}"),
            Dependency::ImageBuild(service) => write!(f, "image/{service}"),
        }
    }
}

/// A Service of type `LoadBalancer` submitted with a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancer {
    pub name: String,
    /// `metadata.namespace` as submitted; `None` when the document has none.
    pub namespace: Option<String>,
}

impl LoadBalancer {
    /// The namespace the Service lives in, falling back to `default`.
    pub fn namespace_or(&self, default: &NamespaceName) -> NamespaceName {
        match self.namespace.as_deref().map(NamespaceName::new) {
            Some(Ok(namespace)) => namespace,
            Some(Err(e)) => {
                tracing::warn!(
                    "Service {} has an invalid namespace ({}), looking it up in {}",
                    self.name,
                    e,
                    default
                );
                default.clone()
            }
            None => default.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentUnit {
    service: ServiceName,
    documents: Vec<ManifestDocument>,
    depends_on: Vec<Dependency>,
}

impl DeploymentUnit {
    pub fn new(
        service: ServiceName,
        documents: Vec<ManifestDocument>,
        depends_on: Vec<Dependency>,
    ) -> Self {
        Self {
            service,
            documents,
            depends_on,
        }
    }

    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    pub fn documents(&self) -> &[ManifestDocument] {
        &self.documents
    }

    pub fn depends_on(&self) -> &[Dependency] {
        &self.depends_on
    }

    pub fn dependency_list(&self) -> String {
        if self.depends_on.is_empty() {
            return "none".to_string();
        }
        self.depends_on
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The unit's Services of type `LoadBalancer`, in document order.
    pub fn load_balancers(&self) -> Vec<LoadBalancer> {
        self.documents
            .iter()
            .filter(|d| d.kind() == ResourceKind::Service)
            .filter(|d| d.service_type() == Some("LoadBalancer"))
            .filter_map(|d| {
                Some(LoadBalancer {
                    name: d.name()?.to_string(),
                    namespace: d.namespace().map(str::to_string),
                })
            })
            .collect()
    }

    /// All documents as one YAML stream.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let mut out = String::new();
        for document in &self.documents {
            out.push_str("---\n");
            out.push_str(&document.to_yaml()?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> NamespaceName {
        NamespaceName::new("shop").unwrap()
    }

    fn lb(namespace: Option<&str>) -> LoadBalancer {
        LoadBalancer {
            name: "ui-service".to_string(),
            namespace: namespace.map(String::from),
        }
    }

    #[test]
    fn load_balancer_keeps_its_own_namespace() {
        assert_eq!(lb(Some("legacy")).namespace_or(&shop()).as_str(), "legacy");
    }

    #[test]
    fn load_balancer_without_namespace_uses_default() {
        assert_eq!(lb(None).namespace_or(&shop()), shop());
        assert_eq!(lb(Some("Not_Valid")).namespace_or(&shop()), shop());
    }

    #[test]
    fn only_load_balancer_services_are_listed() {
        let docs = [
            "kind: Service\nmetadata:\n  name: ui-service\n  namespace: legacy\nspec:\n  type: LoadBalancer\n",
            "kind: Service\nmetadata:\n  name: cart\nspec:\n  type: ClusterIP\n",
        ]
        .iter()
        .map(|y| ManifestDocument::from_yaml(y).unwrap().unwrap())
        .collect();
        let unit = DeploymentUnit::new(ServiceName::new("ui").unwrap(), docs, Vec::new());
        assert_eq!(unit.load_balancers(), vec![lb(Some("legacy"))]);
    }
}
