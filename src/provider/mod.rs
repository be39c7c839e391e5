// ABOUTME: Contracts for the external collaborators and their thin adapters.
// ABOUTME: Cluster provisioning, image builds and declarative apply live behind traits.

mod apply;
mod build;
mod cluster;
mod command;
mod kubectl;
mod render;

pub use apply::{ApplyError, Applier, Endpoint, LoadBalancerIngress};
pub use build::{BuildError, BuildRequest, DockerCli, ImageBuilder, PlannedImages};
pub use cluster::{ClusterError, ClusterOutputs, ClusterProvisioner, ExistingCluster};
pub use kubectl::KubectlApplier;
pub use render::RenderApplier;
