// ABOUTME: End-to-end tests of the staged pipeline with in-memory providers.
// ABOUTME: Covers image resolution, stage toggles, deployment and exports.

mod support;

use kubeform::config::Config;
use kubeform::diagnostics::WarningKind;
use kubeform::output::{Output, OutputMode};
use kubeform::pipeline::{Pipeline, PipelineError, PipelineErrorKind};
use kubeform::provider::{Endpoint, PlannedImages, RenderApplier};
use kubeform::types::ServiceName;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use support::{
    FakeBuilder, FakeProvisioner, RecordingApplier, config_in, deployment, service,
    write_manifest,
};

const YAML: &str = r#"
namespace: shop
registry:
  url: registry.example.com/shop
  tag: abc
services:
  - cart
  - ui
  - name: redis
    image: redis:7
expose:
  marker: ui-service
"#;

fn project(root: &Path) -> Config {
    write_manifest(root, "cart", "deployment.yaml", &deployment("cart", "cart:local"));
    write_manifest(root, "ui", "deployment.yaml", &deployment("ui", "ui:local"));
    write_manifest(root, "ui", "service.yaml", &service("ui-service"));
    config_in(root, YAML)
}

fn quiet() -> Output {
    Output::new(OutputMode::Quiet)
}

#[tokio::test]
async fn full_run_deploys_and_exports() {
    support::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = project(dir.path());

    let provisioner = FakeProvisioner::default();
    let builder = FakeBuilder::default();
    let applier = RecordingApplier {
        endpoints: [(
            "ui-service".to_string(),
            Endpoint::Hostname("ui.elb.example.com".to_string()),
        )]
        .into_iter()
        .collect(),
        ..Default::default()
    };

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&provisioner).await.unwrap();
    assert_eq!(
        pipeline.cluster().unwrap().vpc_id.as_ref().unwrap().as_str(),
        "vpc-0123"
    );

    let pipeline = pipeline.resolve_images(&builder).await.unwrap();
    assert_eq!(
        pipeline.cluster().unwrap().vpc_id.as_ref().unwrap().as_str(),
        "vpc-0123"
    );
    let mut built = builder.built.lock().unwrap().clone();
    built.sort();
    assert_eq!(built, vec!["cart", "ui"]);
    assert_eq!(pipeline.table().len(), 3);
    assert_eq!(
        pipeline
            .table()
            .get(&ServiceName::new("redis").unwrap())
            .unwrap()
            .to_string(),
        "redis:7"
    );

    let report = pipeline.verify(&quiet());
    assert_eq!(report.missing().count(), 1);

    let mut pipeline = pipeline.deploy(&applier).await.unwrap();
    assert_eq!(*applier.namespaces.lock().unwrap(), vec!["shop"]);
    assert_eq!(pipeline.summary().unwrap().deployed_count(), 2);

    let cart = applier.unit("cart").unwrap();
    assert_eq!(
        cart.documents()[0].container_images(),
        vec!["registry.example.com/shop/cart:abc"]
    );
    assert_eq!(
        cart.dependency_list(),
        "namespace/shop, image/cart, image/ui"
    );

    let exports = pipeline.exports(&applier).await.unwrap();
    let json: Value = serde_json::from_str(&exports.to_json().unwrap()).unwrap();
    assert_eq!(json["vpcId"], "vpc-0123");
    assert_eq!(json["registryUrl"], "registry.example.com/shop");
    assert_eq!(json["deployedServices"], json!(["cart", "ui"]));
    assert_eq!(json["deployedCount"], 2);
    assert_eq!(json["ui-service_endpoint"], "ui.elb.example.com");
    assert_eq!(*applier.lookups.lock().unwrap(), vec!["shop/ui-service"]);
    assert!(json["kubeconfig"].as_str().unwrap().contains("kind: Config"));

    let kinds: Vec<_> = pipeline
        .diagnostics()
        .warnings()
        .iter()
        .map(|w| w.kind)
        .collect();
    assert_eq!(kinds, vec![WarningKind::ManifestsMissing]);
}

#[tokio::test]
async fn pending_endpoint_is_null_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let config = project(dir.path());
    let applier = RecordingApplier::default();

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&FakeProvisioner::default()).await.unwrap();
    let pipeline = pipeline.resolve_images(&FakeBuilder::default()).await.unwrap();
    let mut pipeline = pipeline.deploy(&applier).await.unwrap();
    let exports = pipeline.exports(&applier).await.unwrap();

    assert_eq!(exports.get("ui-service_endpoint"), Some(&Value::Null));
    assert!(
        pipeline
            .diagnostics()
            .warnings()
            .iter()
            .any(|w| w.kind == WarningKind::EndpointPending)
    );
}

#[tokio::test]
async fn build_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = project(dir.path());
    let builder = FakeBuilder {
        fail: Some("ui".to_string()),
        ..Default::default()
    };

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&FakeProvisioner::default()).await.unwrap();
    let err = pipeline.resolve_images(&builder).await.unwrap_err();
    assert!(matches!(err, PipelineError::Build { .. }));
    assert_eq!(err.kind(), PipelineErrorKind::ImageBuild);
}

#[tokio::test]
async fn zero_manifests_fails_before_creating_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), YAML);
    let applier = RecordingApplier::default();

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&FakeProvisioner::default()).await.unwrap();
    let pipeline = pipeline.resolve_images(&FakeBuilder::default()).await.unwrap();
    assert!(pipeline.verify(&quiet()).none_found());

    let err = pipeline.deploy(&applier).await.unwrap_err();
    assert!(matches!(err, PipelineError::NoManifests { .. }));
    assert_eq!(err.kind(), PipelineErrorKind::Configuration);
    assert!(applier.namespaces.lock().unwrap().is_empty());
    assert!(applier.applied().is_empty());
}

#[tokio::test]
async fn apply_rejection_is_a_deployment_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = project(dir.path());
    let applier = RecordingApplier {
        reject: Some("ui".to_string()),
        ..Default::default()
    };

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&FakeProvisioner::default()).await.unwrap();
    let pipeline = pipeline.resolve_images(&FakeBuilder::default()).await.unwrap();
    let err = pipeline.deploy(&applier).await.unwrap_err();
    assert_eq!(err.kind(), PipelineErrorKind::Deployment);
    assert!(err.to_string().contains("ui"));
}

#[tokio::test]
async fn disabled_stages_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "cart", "deployment.yaml", &deployment("cart", "cart:local"));
    let yaml = r#"
services:
  - cart
stages:
  provision: false
  build_images: false
  transform: false
"#;
    let config = config_in(dir.path(), yaml);
    let provisioner = FakeProvisioner::default();
    let builder = FakeBuilder::default();
    let applier = RecordingApplier::default();

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&provisioner).await.unwrap();
    assert!(pipeline.cluster().is_none());
    assert_eq!(*provisioner.calls.lock().unwrap(), 0);

    let pipeline = pipeline.resolve_images(&builder).await.unwrap();
    assert!(pipeline.table().is_empty());
    assert!(pipeline.transform_engine().is_none());

    let mut pipeline = pipeline.deploy(&applier).await.unwrap();
    let cart = applier.unit("cart").unwrap();
    assert_eq!(cart.documents()[0].container_images(), vec!["cart:local"]);

    let exports = pipeline.exports(&applier).await.unwrap();
    assert_eq!(exports.get("kubeconfig"), Some(&Value::Null));
    assert_eq!(exports.get("vpcId"), Some(&Value::Null));
    assert_eq!(exports.get("deployedCount"), Some(&json!(1)));
}

#[tokio::test]
async fn endpoint_lookup_uses_the_document_namespace() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "ui",
        "service.yaml",
        r#"apiVersion: v1
kind: Service
metadata:
  name: ui-service
  namespace: legacy
spec:
  type: LoadBalancer
"#,
    );
    let yaml = r#"
namespace: shop
services: [ui]
stages:
  build_images: false
  transform: false
"#;
    let config = config_in(dir.path(), yaml);
    let applier = RecordingApplier {
        endpoints: [(
            "ui-service".to_string(),
            Endpoint::Ip("203.0.113.7".to_string()),
        )]
        .into_iter()
        .collect(),
        ..Default::default()
    };

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&FakeProvisioner::default()).await.unwrap();
    let pipeline = pipeline.resolve_images(&FakeBuilder::default()).await.unwrap();
    let mut pipeline = pipeline.deploy(&applier).await.unwrap();
    let exports = pipeline.exports(&applier).await.unwrap();

    assert_eq!(*applier.lookups.lock().unwrap(), vec!["legacy/ui-service"]);
    assert_eq!(exports.get("ui-service_endpoint"), Some(&json!("203.0.113.7")));
}

#[tokio::test]
async fn deploy_disabled_exports_cluster_only() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = "services: [cart]\nstages:\n  build_images: false\n  deploy: false\n";
    let config = config_in(dir.path(), yaml);
    let applier = RecordingApplier::default();

    let pipeline = Pipeline::new(config).unwrap();
    let pipeline = pipeline.provision(&FakeProvisioner::default()).await.unwrap();
    let pipeline = pipeline.resolve_images(&FakeBuilder::default()).await.unwrap();
    let mut pipeline = pipeline.deploy(&applier).await.unwrap();
    assert!(pipeline.summary().is_none());

    let exports = pipeline.exports(&applier).await.unwrap();
    assert_eq!(exports.get("vpcId"), Some(&json!("vpc-0123")));
    assert!(exports.get("deployedCount").is_none());
}

#[tokio::test]
async fn dry_run_renders_units() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = project(dir.path());
    config.stages.provision = false;
    let render_dir = config.render_dir();
    let applier = RenderApplier::new(&render_dir);

    let pipeline = Pipeline::new(config).unwrap().skip_provision();
    let pipeline = pipeline.resolve_images(&PlannedImages).await.unwrap();
    let mut pipeline = pipeline.deploy(&applier).await.unwrap();
    let exports = pipeline.exports(&applier).await.unwrap();

    let ui = fs::read_to_string(render_dir.join("ui.yaml")).unwrap();
    assert!(ui.contains("# depends-on: namespace/shop, image/cart, image/ui"));
    assert!(ui.contains("registry.example.com/shop/ui:abc"));
    assert!(ui.contains("LoadBalancer"));
    assert!(render_dir.join("00-namespace.yaml").exists());
    assert_eq!(exports.get("ui-service_endpoint"), Some(&Value::Null));
}
