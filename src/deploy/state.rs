// ABOUTME: Deployment status of one logical service.
// ABOUTME: Pending until the orchestrator decides skipped, deployed or failed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    /// Not processed yet.
    #[default]
    Pending,
    /// No manifest directory or no documents in it.
    Skipped,
    /// Unit accepted by the applier.
    Deployed { documents: usize },
    /// Unit rejected by the applier.
    Failed,
}

impl ServiceStatus {
    pub fn is_deployed(&self) -> bool {
        matches!(self, ServiceStatus::Deployed { .. })
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Pending => f.write_str("pending"),
            ServiceStatus::Skipped => f.write_str("skipped"),
            ServiceStatus::Deployed { documents } => write!(f, "deployed ({documents} documents)"),
            ServiceStatus::Failed => f.write_str("failed"),
        }
    }
}
