// ABOUTME: Image build contract plus docker CLI and plan-only adapters.
// ABOUTME: A build turns a service's context into a pushed registry reference.

use async_trait::async_trait;
use std::path::PathBuf;

use super::command;
use crate::types::{ImageRef, ServiceName};

/// One image to build and push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub service: ServiceName,
    pub context: PathBuf,
    pub dockerfile: String,
    /// Reference the image is tagged and pushed as.
    pub target: ImageRef,
}

#[async_trait]
pub trait ImageBuilder: Send + Sync {
    /// Build and push, returning the resolved reference.
    async fn build(&self, request: &BuildRequest) -> Result<ImageRef, BuildError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to run {program} for {service}: {source}")]
    Spawn {
        service: ServiceName,
        program: String,
        source: std::io::Error,
    },

    #[error("{step} failed for {service}: {message}")]
    Failed {
        service: ServiceName,
        step: &'static str,
        message: String,
    },

    #[error("build context for {service} not found: {}", .context.display())]
    MissingContext {
        service: ServiceName,
        context: PathBuf,
    },
}

/// Builds with `docker build` and pushes with `docker push`.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self::with_program("docker")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn step(
        &self,
        request: &BuildRequest,
        step: &'static str,
        args: &[&str],
    ) -> Result<(), BuildError> {
        let output = command::run(&self.program, args, None)
            .await
            .map_err(|source| BuildError::Spawn {
                service: request.service.clone(),
                program: self.program.clone(),
                source,
            })?;
        if !output.success {
            return Err(BuildError::Failed {
                service: request.service.clone(),
                step,
                message: output.failure_message(),
            });
        }
        Ok(())
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageBuilder for DockerCli {
    async fn build(&self, request: &BuildRequest) -> Result<ImageRef, BuildError> {
        if !request.context.is_dir() {
            return Err(BuildError::MissingContext {
                service: request.service.clone(),
                context: request.context.clone(),
            });
        }

        let target = request.target.to_string();
        let dockerfile = request
            .context
            .join(&request.dockerfile)
            .to_string_lossy()
            .into_owned();
        let context = request.context.to_string_lossy().into_owned();

        tracing::info!("Building {} as {}", request.service, target);
        self.step(
            request,
            "docker build",
            &[
                "build",
                "-t",
                target.as_str(),
                "-f",
                dockerfile.as_str(),
                context.as_str(),
            ],
        )
        .await?;

        tracing::info!("Pushing {}", target);
        self.step(request, "docker push", &["push", target.as_str()])
            .await?;

        Ok(request.target.clone())
    }
}

/// Resolves every request to its target without building anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlannedImages;

#[async_trait]
impl ImageBuilder for PlannedImages {
    async fn build(&self, request: &BuildRequest) -> Result<ImageRef, BuildError> {
        tracing::debug!("Planning {} as {}", request.service, request.target);
        Ok(request.target.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(context: &str) -> BuildRequest {
        BuildRequest {
            service: ServiceName::new("cart").unwrap(),
            context: PathBuf::from(context),
            dockerfile: "Dockerfile".to_string(),
            target: ImageRef::parse("registry.local/shop/cart:abc").unwrap(),
        }
    }

    #[tokio::test]
    async fn planned_images_return_targets() {
        let image = PlannedImages.build(&request("/nowhere")).await.unwrap();
        assert_eq!(image.to_string(), "registry.local/shop/cart:abc");
    }

    #[tokio::test]
    async fn docker_requires_existing_context() {
        let err = DockerCli::new()
            .build(&request("/nonexistent/cart"))
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingContext { .. }));
    }

    #[tokio::test]
    async fn failing_build_step_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let builder = DockerCli::with_program("false");
        let err = builder
            .build(&request(dir.path().to_str().unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::Failed { step: "docker build", .. }));
    }
}
