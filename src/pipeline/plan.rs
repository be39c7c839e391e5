// ABOUTME: Decides which services get an image and how.
// ABOUTME: Prebuilt images are used as-is; the rest become build requests.

use crate::config::Config;
use crate::images::BuildOutcome;
use crate::provider::BuildRequest;
use crate::types::{ImageRef, ServiceName};

use super::PipelineError;

/// Services expecting an image, split by how it is obtained.
#[derive(Debug, Clone, Default)]
pub struct ImagePlan {
    /// Every service the table must contain, in configuration order.
    pub expected: Vec<ServiceName>,
    pub prebuilt: Vec<BuildOutcome>,
    pub requests: Vec<BuildRequest>,
}

impl ImagePlan {
    pub fn for_config(config: &Config) -> Result<Self, PipelineError> {
        let mut plan = ImagePlan::default();

        for entry in config.services.iter() {
            if let Some(ref image) = entry.image {
                plan.expected.push(entry.name.clone());
                plan.prebuilt
                    .push(BuildOutcome::new(entry.name.clone(), image.clone()));
                continue;
            }
            if !(config.stages.build_images && entry.build) {
                continue;
            }

            let registry = config.registry.as_ref().ok_or_else(|| PipelineError::Config {
                message: format!("registry.url is required to build {}", entry.name),
            })?;
            let tag = registry.tag.resolve().map_err(|e| PipelineError::Config {
                message: e.to_string(),
            })?;
            let target = ImageRef::in_registry(&registry.url, &entry.name, &tag).map_err(|e| {
                PipelineError::Config {
                    message: format!("image reference for {}: {}", entry.name, e),
                }
            })?;

            plan.expected.push(entry.name.clone());
            plan.requests.push(BuildRequest {
                service: entry.name.clone(),
                context: config.base_dir.join(entry.context_dir(&config.services_root)),
                dockerfile: entry.dockerfile_name().to_string(),
                target,
            });
        }

        tracing::debug!(
            "Image plan: {} build(s), {} prebuilt",
            plan.requests.len(),
            plan.prebuilt.len()
        );
        Ok(plan)
    }
}
