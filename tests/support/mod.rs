// ABOUTME: Test support utilities.
// ABOUTME: Project fixtures on disk and in-memory provider fakes.

use async_trait::async_trait;
use kubeform::config::{ClusterSpec, Config};
use kubeform::deploy::DeploymentUnit;
use kubeform::provider::{
    Applier, ApplyError, BuildError, BuildRequest, ClusterError, ClusterOutputs,
    ClusterProvisioner, Endpoint, ImageBuilder,
};
use kubeform::types::{ImageRef, NamespaceName, VpcId};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("kubeform=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Write `<root>/src/<service>/kubernetes/<file>`.
#[allow(dead_code)]
pub fn write_manifest(root: &Path, service: &str, file: &str, content: &str) {
    let dir = root.join("src").join(service).join("kubernetes");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

/// Parse `yaml` as a config rooted at `base_dir`.
#[allow(dead_code)]
pub fn config_in(base_dir: &Path, yaml: &str) -> Config {
    let mut config = Config::from_yaml(yaml).unwrap();
    config.base_dir = base_dir.to_path_buf();
    config
}

#[allow(dead_code)]
pub fn deployment(service: &str, image: &str) -> String {
    format!(
        r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {service}
spec:
  template:
    spec:
      containers:
        - name: {service}
          image: {image}
"#
    )
}

#[allow(dead_code)]
pub fn service(name: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Service
metadata:
  name: {name}
spec:
  type: ClusterIP
  ports:
    - port: 80
"#
    )
}

/// Provisioner returning fixed outputs.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeProvisioner {
    pub calls: Mutex<usize>,
}

#[async_trait]
impl ClusterProvisioner for FakeProvisioner {
    async fn provision(&self, _spec: &ClusterSpec) -> Result<ClusterOutputs, ClusterError> {
        *self.calls.lock().unwrap() += 1;
        Ok(ClusterOutputs {
            kubeconfig: "apiVersion: v1\nkind: Config\n".to_string(),
            kubeconfig_path: None,
            vpc_id: Some(VpcId::new("vpc-0123")),
        })
    }
}

/// Builder that "pushes" every target and can be told to fail one service.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeBuilder {
    pub fail: Option<String>,
    pub built: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageBuilder for FakeBuilder {
    async fn build(&self, request: &BuildRequest) -> Result<ImageRef, BuildError> {
        if self.fail.as_deref() == Some(request.service.as_str()) {
            return Err(BuildError::Failed {
                service: request.service.clone(),
                step: "build",
                message: "exit status 1".to_string(),
            });
        }
        self.built
            .lock()
            .unwrap()
            .push(request.service.to_string());
        Ok(request.target.clone())
    }
}

/// Applier that records what it is given.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingApplier {
    pub namespaces: Mutex<Vec<String>>,
    pub units: Mutex<Vec<DeploymentUnit>>,
    pub reject: Option<String>,
    pub endpoints: HashMap<String, Endpoint>,
    /// `namespace/service` of every endpoint lookup.
    pub lookups: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingApplier {
    pub fn applied(&self) -> Vec<String> {
        self.units
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.service().to_string())
            .collect()
    }

    pub fn unit(&self, service: &str) -> Option<DeploymentUnit> {
        self.units
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.service().as_str() == service)
            .cloned()
    }
}

#[async_trait]
impl Applier for RecordingApplier {
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), ApplyError> {
        self.namespaces.lock().unwrap().push(namespace.to_string());
        Ok(())
    }

    async fn apply(&self, unit: &DeploymentUnit) -> Result<(), ApplyError> {
        if self.reject.as_deref() == Some(unit.service().as_str()) {
            return Err(ApplyError::Rejected {
                target: unit.service().to_string(),
                message: "admission webhook denied the request".to_string(),
            });
        }
        self.units.lock().unwrap().push(unit.clone());
        Ok(())
    }

    async fn endpoint(
        &self,
        namespace: &NamespaceName,
        service: &str,
    ) -> Result<Option<Endpoint>, ApplyError> {
        self.lookups
            .lock()
            .unwrap()
            .push(format!("{namespace}/{service}"));
        Ok(self.endpoints.get(service).cloned())
    }
}
