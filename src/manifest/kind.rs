// ABOUTME: Resource kinds the rewrite rules know about.
// ABOUTME: Maps workload kinds to the path of their pod spec.

use std::fmt;

const POD_SPEC: &[&str] = &["spec", "template", "spec"];
const CRONJOB_POD_SPEC: &[&str] = &["spec", "jobTemplate", "spec", "template", "spec"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
    CronJob,
    Service,
    Other(String),
}

impl ResourceKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "Deployment" => ResourceKind::Deployment,
            "StatefulSet" => ResourceKind::StatefulSet,
            "DaemonSet" => ResourceKind::DaemonSet,
            "Job" => ResourceKind::Job,
            "CronJob" => ResourceKind::CronJob,
            "Service" => ResourceKind::Service,
            other => ResourceKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::DaemonSet => "DaemonSet",
            ResourceKind::Job => "Job",
            ResourceKind::CronJob => "CronJob",
            ResourceKind::Service => "Service",
            ResourceKind::Other(s) => s,
        }
    }

    /// Kinds that carry a pod template.
    pub fn is_workload(&self) -> bool {
        matches!(
            self,
            ResourceKind::Deployment
                | ResourceKind::StatefulSet
                | ResourceKind::DaemonSet
                | ResourceKind::Job
                | ResourceKind::CronJob
        )
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ResourceKind::Other(_))
    }

    /// Keys leading from the document root to the pod spec.
    pub fn pod_spec_path(&self) -> Option<&'static [&'static str]> {
        match self {
            ResourceKind::CronJob => Some(CRONJOB_POD_SPEC),
            k if k.is_workload() => Some(POD_SPEC),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
