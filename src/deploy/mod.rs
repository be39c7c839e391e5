// ABOUTME: Per-service deployment: units, orchestration and result aggregation.
// ABOUTME: Each service moves from pending to skipped, deployed or failed.

mod error;
mod orchestrator;
mod state;
mod summary;
mod unit;

pub use error::DeployError;
pub use orchestrator::Orchestrator;
pub use state::ServiceStatus;
pub use summary::DeploymentSummary;
pub use unit::{Dependency, DeploymentUnit, LoadBalancer};
