// ABOUTME: Status command implementation.
// ABOUTME: Shows the resolved configuration after stack overrides.

use kubeform::config::Config;
use kubeform::error::Result;
use kubeform::output::{Output, OutputMode};
use serde_json::json;

pub fn status(config: &Config, output: &Output) -> Result<()> {
    let spec = config.cluster.spec()?;
    let registry = config.registry.as_ref().map(|r| r.url.to_string());
    let services: Vec<String> = config.service_names().iter().map(|s| s.to_string()).collect();

    if output.mode() == OutputMode::Json {
        let value = json!({
            "event": "status",
            "namespace": config.namespace.as_str(),
            "registry": registry,
            "cluster": {
                "minClusterSize": spec.min_size,
                "maxClusterSize": spec.max_size,
                "desiredClusterSize": spec.desired_size,
                "nodeInstanceType": spec.node_instance_type,
                "vpcCidr": spec.vpc_cidr.to_string(),
            },
            "services": services,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    println!("Namespace: {}", config.namespace);
    println!(
        "Registry: {}",
        registry.as_deref().unwrap_or("(prebuilt images only)")
    );
    println!(
        "Cluster: {} x {} ({}..{} nodes), VPC {}",
        spec.desired_size,
        spec.node_instance_type,
        spec.min_size,
        spec.max_size,
        spec.vpc_cidr
    );
    println!("Services: {}", services.join(", "));
    Ok(())
}
