// ABOUTME: Verify command implementation.
// ABOUTME: Reports which services have manifests without touching the cluster.

use kubeform::config::Config;
use kubeform::error::Result;
use kubeform::manifest::ManifestSource;
use kubeform::output::Output;
use kubeform::pipeline::PipelineError;

/// Print the manifest presence report; fails when no service has manifests.
pub fn verify(config: Config, output: &Output) -> Result<()> {
    let source = ManifestSource::from_config(&config);
    let report = source.report(&config.service_names());
    output.report(&report);

    if report.none_found() {
        return Err(PipelineError::NoManifests {
            root: source.services_root().to_path_buf(),
        }
        .into());
    }

    let missing = report.missing().count();
    if missing > 0 {
        output.warning(&format!("{missing} service(s) will be skipped"));
    }
    output.success(&format!(
        "{} of {} service(s) ready to deploy",
        report.found().count(),
        report.entries().len()
    ));
    Ok(())
}
