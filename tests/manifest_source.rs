// ABOUTME: Tests for manifest discovery and decoding on disk.
// ABOUTME: Missing directories are reported, never errors; bad YAML is.

mod support;

use kubeform::manifest::{DecodeError, ManifestSource, ResourceKind, decode_documents, decode_file};
use kubeform::types::ServiceName;
use std::fs;
use std::path::Path;
use support::write_manifest;

fn svc(name: &str) -> ServiceName {
    ServiceName::new(name).unwrap()
}

fn source(root: &Path) -> ManifestSource {
    ManifestSource::new(root.join("src"), "kubernetes")
}

#[test]
fn resolves_sorted_yaml_files() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "cart", "service.yml", "kind: Service\n");
    write_manifest(dir.path(), "cart", "deployment.yaml", "kind: Deployment\n");
    write_manifest(dir.path(), "cart", "README.md", "# notes\n");

    let files = source(dir.path()).resolve(&svc("cart"));
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["deployment.yaml", "service.yml"]);
}

#[test]
fn missing_directory_resolves_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(source(dir.path()).resolve(&svc("orders")).is_empty());
}

#[test]
fn directory_without_yaml_resolves_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "ui", "notes.txt", "nothing here");
    assert!(source(dir.path()).resolve(&svc("ui")).is_empty());
}

#[test]
fn report_lists_found_and_missing() {
    support::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "cart", "deployment.yaml", "kind: Deployment\n");
    write_manifest(dir.path(), "cart", "service.yaml", "kind: Service\n");

    let report = source(dir.path()).report(&[svc("cart"), svc("ui")]);
    assert!(!report.none_found());
    assert_eq!(report.found().count(), 1);
    assert_eq!(report.entries()[0].files, 2);

    let missing: Vec<_> = report.missing().map(|e| e.service.to_string()).collect();
    assert_eq!(missing, vec!["ui"]);

    let lines = report.lines();
    assert!(lines[0].contains("✓ cart: 2 file(s)"));
    assert!(lines[1].contains("✗ ui: not found"));
}

#[test]
fn report_with_nothing_found() {
    let dir = tempfile::tempdir().unwrap();
    let report = source(dir.path()).report(&[svc("cart"), svc("ui")]);
    assert!(report.none_found());
}

#[test]
fn decodes_multi_document_streams() {
    let yaml = r#"
---
kind: Deployment
metadata:
  name: cart
---
---
kind: Service
metadata:
  name: cart
"#;
    let documents = decode_documents(yaml, Path::new("cart.yaml")).unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].kind(), ResourceKind::Deployment);
    assert_eq!(documents[1].kind(), ResourceKind::Service);
}

#[test]
fn scalar_document_is_rejected() {
    let err = decode_documents("kind: Service\n---\njust a string\n", Path::new("bad.yaml"))
        .unwrap_err();
    assert!(matches!(err, DecodeError::NotAMapping { index: 1, .. }));
}

#[tokio::test]
async fn invalid_yaml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "kind: Service\nmetadata: [unclosed\n").unwrap();
    let err = decode_file(&path).await.unwrap_err();
    assert!(matches!(err, DecodeError::Yaml { .. }));
    assert!(err.to_string().contains("broken.yaml"));
}

#[tokio::test]
async fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = decode_file(&dir.path().join("gone.yaml")).await.unwrap_err();
    assert!(matches!(err, DecodeError::Read { .. }));
}
