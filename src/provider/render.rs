// ABOUTME: Applier that writes units to disk instead of submitting them.
// ABOUTME: One multi-document YAML file per unit, headed by its dependency list.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};

use super::apply::{ApplyError, Applier, Endpoint};
use crate::deploy::DeploymentUnit;
use crate::types::NamespaceName;

pub const NAMESPACE_FILE: &str = "00-namespace.yaml";

#[derive(Debug, Clone)]
pub struct RenderApplier {
    dir: PathBuf,
}

impl RenderApplier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn unit_path(&self, unit: &DeploymentUnit) -> PathBuf {
        self.dir.join(format!("{}.yaml", unit.service()))
    }

    async fn write(&self, path: PathBuf, content: String) -> Result<(), ApplyError> {
        let write = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&path, content).await
        };
        write.await.map_err(|source| ApplyError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Rendered {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl Applier for RenderApplier {
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), ApplyError> {
        let content =
            format!("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: {namespace}\n");
        self.write(self.dir.join(NAMESPACE_FILE), content).await
    }

    async fn apply(&self, unit: &DeploymentUnit) -> Result<(), ApplyError> {
        let body = unit.to_yaml().map_err(|source| ApplyError::Encode {
            target: unit.service().to_string(),
            source,
        })?;
        let content = format!(
            "# unit: {}\n# depends-on: {}\n# rendered-at: {}\n{}",
            unit.service(),
            unit.dependency_list(),
            Utc::now().to_rfc3339(),
            body
        );
        self.write(self.unit_path(unit), content).await
    }

    async fn endpoint(
        &self,
        _namespace: &NamespaceName,
        _service: &str,
    ) -> Result<Option<Endpoint>, ApplyError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::Dependency;
    use crate::manifest::ManifestDocument;
    use crate::types::ServiceName;

    #[tokio::test]
    async fn writes_unit_with_dependency_header() {
        let dir = tempfile::tempdir().unwrap();
        let applier = RenderApplier::new(dir.path().join("out"));
        let namespace = NamespaceName::new("shop").unwrap();
        let cart = ServiceName::new("cart").unwrap();
        let document = ManifestDocument::from_yaml("kind: Service\nmetadata:\n  name: cart\n")
            .unwrap()
            .unwrap();
        let unit = DeploymentUnit::new(
            cart.clone(),
            vec![document],
            vec![Dependency::Namespace(namespace.clone()), Dependency::ImageBuild(cart)],
        );

        applier.ensure_namespace(&namespace).await.unwrap();
        applier.apply(&unit).await.unwrap();

        let rendered = std::fs::read_to_string(applier.unit_path(&unit)).unwrap();
        assert!(rendered.starts_with("# unit: cart\n# depends-on: namespace/shop, image/cart\n"));
        assert!(rendered.contains("kind: Service"));
        assert!(applier.dir().join(NAMESPACE_FILE).exists());
        assert_eq!(applier.endpoint(&namespace, "cart").await.unwrap(), None);
    }
}
