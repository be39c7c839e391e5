// ABOUTME: Applier that drives kubectl against the provisioned cluster.
// ABOUTME: Pipes rendered units to `kubectl apply` and polls Service status for endpoints.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

use super::apply::{ApplyError, Applier, Endpoint, LoadBalancerIngress};
use super::command::{self, CommandOutput};
use crate::deploy::DeploymentUnit;
use crate::types::NamespaceName;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct KubectlApplier {
    program: String,
    kubeconfig: Option<PathBuf>,
    endpoint_timeout: Duration,
}

impl KubectlApplier {
    pub fn new(program: impl Into<String>, kubeconfig: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            kubeconfig,
            endpoint_timeout: Duration::ZERO,
        }
    }

    pub fn endpoint_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint_timeout = timeout;
        self
    }

    async fn kubectl(&self, args: &[&str], stdin: Option<&str>) -> Result<CommandOutput, ApplyError> {
        let kubeconfig = self
            .kubeconfig
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
        if let Some(ref path) = kubeconfig {
            full.push("--kubeconfig");
            full.push(path.as_str());
        }
        full.extend_from_slice(args);

        command::run(&self.program, &full, stdin)
            .await
            .map_err(|source| ApplyError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    async fn apply_stream(&self, target: &str, yaml: &str) -> Result<(), ApplyError> {
        let output = self.kubectl(&["apply", "-f", "-"], Some(yaml)).await?;
        if !output.success {
            return Err(ApplyError::Rejected {
                target: target.to_string(),
                message: output.failure_message(),
            });
        }
        tracing::debug!("{}: {}", target, output.stdout.trim());
        Ok(())
    }

    async fn lookup_endpoint(
        &self,
        namespace: &NamespaceName,
        service: &str,
    ) -> Result<Option<Endpoint>, ApplyError> {
        let output = self
            .kubectl(
                &["get", "service", service, "-n", namespace.as_str(), "-o", "json"],
                None,
            )
            .await?;
        if !output.success {
            return Err(ApplyError::Rejected {
                target: format!("service/{service}"),
                message: output.failure_message(),
            });
        }

        let status: ServiceObject =
            serde_json::from_str(&output.stdout).map_err(|source| ApplyError::Status {
                service: service.to_string(),
                source,
            })?;
        Ok(Endpoint::from_ingress(&status.status.load_balancer.ingress))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ServiceObject {
    #[serde(default)]
    status: ServiceStatus,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceStatus {
    #[serde(default, rename = "loadBalancer")]
    load_balancer: LoadBalancerStatus,
}

#[derive(Debug, Default, Deserialize)]
struct LoadBalancerStatus {
    #[serde(default)]
    ingress: Vec<LoadBalancerIngress>,
}

fn namespace_manifest(namespace: &NamespaceName) -> String {
    format!("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: {namespace}\n")
}

#[async_trait]
impl Applier for KubectlApplier {
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), ApplyError> {
        tracing::info!("Ensuring namespace {}", namespace);
        self.apply_stream(&format!("namespace/{namespace}"), &namespace_manifest(namespace))
            .await
    }

    async fn apply(&self, unit: &DeploymentUnit) -> Result<(), ApplyError> {
        let yaml = unit.to_yaml().map_err(|source| ApplyError::Encode {
            target: unit.service().to_string(),
            source,
        })?;
        tracing::info!(
            "Applying {} document(s) for {} (after {})",
            unit.documents().len(),
            unit.service(),
            unit.dependency_list()
        );
        self.apply_stream(unit.service().as_str(), &yaml).await
    }

    async fn endpoint(
        &self,
        namespace: &NamespaceName,
        service: &str,
    ) -> Result<Option<Endpoint>, ApplyError> {
        let deadline = Instant::now() + self.endpoint_timeout;
        loop {
            if let Some(endpoint) = self.lookup_endpoint(namespace, service).await? {
                return Ok(Some(endpoint));
            }
            if Instant::now() + POLL_INTERVAL > deadline {
                return Ok(None);
            }
            tracing::debug!("Waiting for load balancer of {}", service);
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_status() {
        let json = r#"{"status":{"loadBalancer":{"ingress":[{"hostname":"ui.elb.amazonaws.com"}]}}}"#;
        let object: ServiceObject = serde_json::from_str(json).unwrap();
        assert_eq!(
            Endpoint::from_ingress(&object.status.load_balancer.ingress),
            Some(Endpoint::Hostname("ui.elb.amazonaws.com".to_string()))
        );
    }

    #[test]
    fn pending_status_has_no_ingress() {
        let object: ServiceObject = serde_json::from_str(r#"{"status":{"loadBalancer":{}}}"#).unwrap();
        assert!(object.status.load_balancer.ingress.is_empty());
    }

    #[test]
    fn namespace_manifest_names_namespace() {
        let yaml = namespace_manifest(&NamespaceName::new("shop").unwrap());
        assert!(yaml.contains("kind: Namespace"));
        assert!(yaml.contains("name: shop"));
    }

    #[tokio::test]
    async fn rejected_apply_surfaces_stderr() {
        let applier = KubectlApplier::new("false", None);
        let err = applier
            .ensure_namespace(&NamespaceName::new("shop").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplyError::Rejected { .. }));
    }
}
