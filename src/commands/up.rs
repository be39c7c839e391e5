// ABOUTME: Up command implementation.
// ABOUTME: Runs the pipeline stages and prints or writes the exported values.

use kubeform::config::Config;
use kubeform::error::Result;
use kubeform::output::Output;
use kubeform::pipeline::{Pipeline, PipelineError};
use kubeform::provider::{
    Applier, DockerCli, ExistingCluster, ImageBuilder, KubectlApplier, PlannedImages,
    RenderApplier,
};
use std::path::Path;

/// Provision, build, verify, deploy and export.
///
/// With `dry_run`, provisioning is skipped, images are planned rather than
/// built, and units are rendered to `apply.render_dir`.
pub async fn up(
    mut config: Config,
    dry_run: bool,
    exports_path: Option<&Path>,
    mut output: Output,
) -> Result<()> {
    output.start_timer();

    if dry_run {
        config.stages.provision = false;
    }

    let pipeline = Pipeline::new(config)?;
    let services = pipeline.config().services.len();
    output.progress(&format!(
        "Deploying {} service(s) to namespace {}{}",
        services,
        pipeline.config().namespace,
        if dry_run { " (dry run)" } else { "" }
    ));

    let pipeline = if pipeline.config().stages.provision {
        output.progress("  → Connecting to cluster...");
        let cluster = pipeline.config().cluster.clone();
        let provisioner = ExistingCluster::from_config(&cluster, &pipeline.config().base_dir)
            .map_err(|source| PipelineError::Provision { source })?;
        pipeline.provision(&provisioner).await?
    } else {
        pipeline.skip_provision()
    };

    let builder: Box<dyn ImageBuilder> = if dry_run {
        Box::new(PlannedImages)
    } else {
        Box::new(DockerCli::new())
    };
    output.progress("  → Resolving images...");
    let pipeline = pipeline.resolve_images(builder.as_ref()).await?;

    if pipeline.config().stages.validate {
        pipeline.verify(&output);
    }

    let applier: Box<dyn Applier> = if dry_run {
        let dir = pipeline.config().render_dir();
        output.progress(&format!("  → Rendering units to {}...", dir.display()));
        Box::new(RenderApplier::new(dir))
    } else {
        let kubeconfig = pipeline
            .cluster()
            .and_then(|c| c.kubeconfig_path.clone());
        output.progress("  → Applying manifests...");
        Box::new(
            KubectlApplier::new(&pipeline.config().apply.kubectl, kubeconfig)
                .endpoint_timeout(pipeline.config().apply.endpoint_timeout),
        )
    };

    let mut pipeline = pipeline.deploy(applier.as_ref()).await?;
    let exports = pipeline.exports(applier.as_ref()).await?;

    for warning in pipeline.diagnostics().warnings() {
        output.warning(&warning.message);
    }

    output.exports(&exports);
    if let Some(path) = exports_path {
        exports.write(path)?;
        output.progress(&format!("Exports written to {}", path.display()));
    }

    if let Some(summary) = pipeline.summary() {
        for (service, status) in summary.iter() {
            output.progress(&format!("  {service}: {status}"));
        }
    }

    let deployed = pipeline.summary().map_or(0, |s| s.deployed_count());
    output.success(&format!("Deployed {deployed} of {services} service(s)"));
    Ok(())
}
