// ABOUTME: The provisioning and deployment pipeline using the type state pattern.
// ABOUTME: Stages run in order; later stages only accept the outputs of earlier ones.

mod error;
mod plan;
mod state;

pub use error::{PipelineError, PipelineErrorKind};
pub use plan::ImagePlan;
pub use state::{Configured, Deployed, ImagesResolved, Provisioned};

use error::{
    BuildSnafu, DeploySnafu, ExportSnafu, ImagesSnafu, NamespaceSnafu, NoManifestsSnafu,
    ProvisionSnafu,
};
use futures::future::try_join_all;
use serde_json::Value;
use snafu::ResultExt;
use std::sync::Arc;

use crate::config::{ClusterSpec, Config};
use crate::deploy::{Dependency, DeploymentSummary, Orchestrator};
use crate::diagnostics::{Diagnostics, Warning};
use crate::exports::{self, Exports};
use crate::images::{BuildOutcome, ImageTable};
use crate::manifest::{ManifestSource, PresenceReport};
use crate::output::Output;
use crate::provider::{Applier, BuildError, ClusterOutputs, ClusterProvisioner, ImageBuilder};
use crate::transform::{ServiceTypeOverride, TransformEngine};

/// A pipeline run, parameterized by the last completed stage.
#[derive(Debug)]
pub struct Pipeline<S> {
    config: Config,
    spec: ClusterSpec,
    diagnostics: Diagnostics,
    state: S,
}

impl<S> Pipeline<S> {
    fn transition<T>(self, state: T) -> Pipeline<T> {
        Pipeline {
            config: self.config,
            spec: self.spec,
            diagnostics: self.diagnostics,
            state,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cluster_spec(&self) -> &ClusterSpec {
        &self.spec
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

// =============================================================================
// Configured -> Provisioned
// =============================================================================

impl Pipeline<Configured> {
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        let spec = config.cluster.spec().map_err(|e| PipelineError::Config {
            message: e.to_string(),
        })?;
        Ok(Pipeline {
            config,
            spec,
            diagnostics: Diagnostics::default(),
            state: Configured,
        })
    }

    /// Continue without a cluster; exports carry no kubeconfig or VPC.
    pub fn skip_provision(self) -> Pipeline<Provisioned> {
        tracing::info!("Cluster provisioning disabled");
        self.transition(Provisioned { cluster: None })
    }

    pub async fn provision<P: ClusterProvisioner + ?Sized>(
        self,
        provisioner: &P,
    ) -> Result<Pipeline<Provisioned>, PipelineError> {
        if !self.config.stages.provision {
            return Ok(self.skip_provision());
        }

        let outputs = provisioner
            .provision(&self.spec)
            .await
            .context(ProvisionSnafu)?;
        Ok(self.transition(Provisioned {
            cluster: Some(outputs),
        }))
    }
}

// =============================================================================
// Provisioned -> ImagesResolved
// =============================================================================

impl Pipeline<Provisioned> {
    pub fn cluster(&self) -> Option<&ClusterOutputs> {
        self.state.cluster.as_ref()
    }

    pub fn image_plan(&self) -> Result<ImagePlan, PipelineError> {
        ImagePlan::for_config(&self.config)
    }

    /// Run every build concurrently and fold the results into the image table.
    pub async fn resolve_images<B: ImageBuilder + ?Sized>(
        self,
        builder: &B,
    ) -> Result<Pipeline<ImagesResolved>, PipelineError> {
        let plan = self.image_plan()?;

        let built = try_join_all(plan.requests.iter().map(|request| async move {
            let image = builder.build(request).await?;
            Ok::<_, BuildError>(BuildOutcome::new(request.service.clone(), image))
        }))
        .await
        .context(BuildSnafu)?;

        let builds = plan
            .requests
            .iter()
            .map(|r| Dependency::ImageBuild(r.service.clone()))
            .collect();

        let mut outcomes = plan.prebuilt;
        outcomes.extend(built);
        let table = ImageTable::from_builds(&plan.expected, outcomes).context(ImagesSnafu)?;

        for (service, image) in table.iter() {
            tracing::info!("Image for {}: {}", service, image);
        }

        let cluster = self.state.cluster.clone();
        Ok(self.transition(ImagesResolved {
            cluster,
            table: Arc::new(table),
            builds,
        }))
    }
}

// =============================================================================
// ImagesResolved -> Deployed
// =============================================================================

impl Pipeline<ImagesResolved> {
    pub fn cluster(&self) -> Option<&ClusterOutputs> {
        self.state.cluster.as_ref()
    }

    pub fn table(&self) -> &ImageTable {
        &self.state.table
    }

    pub fn manifest_source(&self) -> ManifestSource {
        ManifestSource::from_config(&self.config)
    }

    /// Print the pre-flight presence report of every service's manifests.
    pub fn verify(&self, output: &Output) -> PresenceReport {
        let report = self.manifest_source().report(&self.config.service_names());
        output.report(&report);
        report
    }

    /// The rule engine for this run, or `None` with transforms disabled.
    pub fn transform_engine(&self) -> Option<TransformEngine> {
        if !self.config.stages.transform {
            return None;
        }
        Some(TransformEngine::new(
            Arc::clone(&self.state.table),
            self.config.namespace.clone(),
            self.config.expose.as_ref().map(ServiceTypeOverride::from_config),
        ))
    }

    pub async fn deploy<A: Applier + ?Sized>(
        mut self,
        applier: &A,
    ) -> Result<Pipeline<Deployed>, PipelineError> {
        let cluster = self.state.cluster.clone();
        if !self.config.stages.deploy {
            tracing::info!("Workload deployment disabled");
            return Ok(self.transition(Deployed {
                cluster,
                summary: None,
            }));
        }

        let source = self.manifest_source();
        let services = self.config.service_names();
        if services.iter().all(|s| source.resolve(s).is_empty()) {
            tracing::error!(
                "No manifests found for any service under {}",
                source.services_root().display()
            );
            return NoManifestsSnafu {
                root: source.services_root().to_path_buf(),
            }
            .fail();
        }

        let namespace = self.config.namespace.clone();
        applier
            .ensure_namespace(&namespace)
            .await
            .context(NamespaceSnafu)?;

        let mut dependencies = vec![Dependency::Namespace(namespace)];
        dependencies.extend(self.state.builds.iter().cloned());

        let engine = self.transform_engine();
        let summary = Orchestrator::new(&source, engine.as_ref(), dependencies)
            .run(&services, applier)
            .await
            .context(DeploySnafu)?;

        for service in summary.skipped() {
            self.diagnostics.warn(Warning::manifests_missing(service));
        }

        Ok(self.transition(Deployed {
            cluster,
            summary: Some(summary),
        }))
    }
}

// =============================================================================
// Deployed -> Exports
// =============================================================================

impl Pipeline<Deployed> {
    pub fn summary(&self) -> Option<&DeploymentSummary> {
        self.state.summary.as_ref()
    }

    /// Collect exported values, looking up load balancer endpoints.
    pub async fn exports<A: Applier + ?Sized>(
        &mut self,
        applier: &A,
    ) -> Result<Exports, PipelineError> {
        let mut out = Exports::default();
        let cluster = self.state.cluster.as_ref();

        out.set(
            exports::KUBECONFIG,
            cluster.map_or(Value::Null, |c| Value::from(c.kubeconfig.clone())),
        );
        out.set(
            exports::VPC_ID,
            cluster
                .and_then(|c| c.vpc_id.as_ref())
                .map_or(Value::Null, |id| Value::from(id.to_string())),
        );
        out.set(
            exports::REGISTRY_URL,
            self.config
                .registry
                .as_ref()
                .map_or(Value::Null, |r| Value::from(r.url.to_string())),
        );

        let Some(summary) = self.state.summary.as_ref() else {
            return Ok(out);
        };

        let deployed: Vec<String> = summary.deployed().iter().map(|s| s.to_string()).collect();
        out.set(exports::DEPLOYED_COUNT, deployed.len());
        out.set(exports::DEPLOYED_SERVICES, deployed);

        for (_, lb) in summary.load_balancers() {
            let name = lb.name.as_str();
            let namespace = lb.namespace_or(&self.config.namespace);
            let endpoint = applier
                .endpoint(&namespace, name)
                .await
                .context(ExportSnafu)?;
            match endpoint {
                Some(endpoint) => out.set(exports::endpoint_key(name), endpoint.to_string()),
                None => {
                    self.diagnostics.warn(Warning::endpoint_pending(name));
                    out.set(exports::endpoint_key(name), Value::Null);
                }
            }
        }

        Ok(out)
    }
}
