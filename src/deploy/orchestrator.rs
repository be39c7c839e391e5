// ABOUTME: Loads, transforms and submits each service's manifests as one unit.
// ABOUTME: Missing manifests skip a service; decode or apply failures are fatal.

use futures::future::join_all;
use std::path::PathBuf;

use crate::manifest::{self, ManifestSource};
use crate::provider::Applier;
use crate::transform::TransformEngine;
use crate::types::ServiceName;

use super::{DeployError, Dependency, DeploymentSummary, DeploymentUnit, ServiceStatus};

pub struct Orchestrator<'a> {
    source: &'a ManifestSource,
    engine: Option<&'a TransformEngine>,
    dependencies: Vec<Dependency>,
}

impl<'a> Orchestrator<'a> {
    /// `engine` is `None` when documents are submitted as converted.
    /// `dependencies` are declared on every unit.
    pub fn new(
        source: &'a ManifestSource,
        engine: Option<&'a TransformEngine>,
        dependencies: Vec<Dependency>,
    ) -> Self {
        Self {
            source,
            engine,
            dependencies,
        }
    }

    /// Build the unit for one service, or `None` when it has nothing to deploy.
    pub async fn prepare(
        &self,
        service: &ServiceName,
    ) -> Result<Option<DeploymentUnit>, DeployError> {
        let files = self.source.resolve(service);
        if files.is_empty() {
            return Ok(None);
        }

        let mut documents = Vec::new();
        for file in &files {
            let decoded = manifest::decode_file(file)
                .await
                .map_err(|source| DeployError::Decode {
                    service: service.clone(),
                    source,
                })?;
            documents.extend(decoded);
        }
        if documents.is_empty() {
            tracing::warn!("Manifests for {} contain no documents", service);
            return Ok(None);
        }

        if let Some(engine) = self.engine {
            for document in &mut documents {
                engine.apply(document);
            }
        }

        Ok(Some(DeploymentUnit::new(
            service.clone(),
            documents,
            self.dependencies.clone(),
        )))
    }

    /// Deploy every service and aggregate the outcome.
    ///
    /// Units are submitted concurrently; the applier orders them by their
    /// declared dependencies. The first failure in service order is returned.
    pub async fn run<A: Applier + ?Sized>(
        &self,
        services: &[ServiceName],
        applier: &A,
    ) -> Result<DeploymentSummary, DeployError> {
        let mut summary = DeploymentSummary::new(services);
        let mut units = Vec::new();

        for service in services {
            match self.prepare(service).await? {
                Some(unit) => units.push(unit),
                None => {
                    tracing::warn!("Skipping {}: no manifests", service);
                    summary.record(service, ServiceStatus::Skipped);
                }
            }
        }

        if units.is_empty() && !services.is_empty() {
            tracing::error!(
                "No manifests found for any service under {}",
                self.source.services_root().display()
            );
            return Err(DeployError::NoManifests {
                root: PathBuf::from(self.source.services_root()),
            });
        }

        let results = join_all(units.iter().map(|unit| applier.apply(unit))).await;

        let mut first_error = None;
        for (unit, result) in units.iter().zip(results) {
            match result {
                Ok(()) => {
                    tracing::info!("Deployed {}", unit.service());
                    summary.record(
                        unit.service(),
                        ServiceStatus::Deployed {
                            documents: unit.documents().len(),
                        },
                    );
                    for lb in unit.load_balancers() {
                        summary.record_load_balancer(unit.service(), lb);
                    }
                }
                Err(source) => {
                    tracing::error!("Failed to deploy {}: {}", unit.service(), source);
                    summary.record(unit.service(), ServiceStatus::Failed);
                    if first_error.is_none() {
                        first_error = Some(DeployError::Apply {
                            service: unit.service().clone(),
                            source,
                        });
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }
}
