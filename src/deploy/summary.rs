// ABOUTME: Aggregated outcome of a deployment run.
// ABOUTME: Lists deployed and skipped services and the load balancers they expose.

use crate::types::ServiceName;

use super::{LoadBalancer, ServiceStatus};

#[derive(Debug, Clone, Default)]
pub struct DeploymentSummary {
    services: Vec<(ServiceName, ServiceStatus)>,
    load_balancers: Vec<(ServiceName, LoadBalancer)>,
}

impl DeploymentSummary {
    /// Start with every service pending.
    pub fn new(services: &[ServiceName]) -> Self {
        Self {
            services: services
                .iter()
                .map(|s| (s.clone(), ServiceStatus::Pending))
                .collect(),
            load_balancers: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, service: &ServiceName, status: ServiceStatus) {
        match self.services.iter_mut().find(|(s, _)| s == service) {
            Some((_, current)) => *current = status,
            None => self.services.push((service.clone(), status)),
        }
    }

    pub(crate) fn record_load_balancer(&mut self, service: &ServiceName, lb: LoadBalancer) {
        self.load_balancers.push((service.clone(), lb));
    }

    pub fn status(&self, service: &ServiceName) -> Option<ServiceStatus> {
        self.services
            .iter()
            .find(|(s, _)| s == service)
            .map(|(_, status)| *status)
    }

    pub fn deployed(&self) -> Vec<&ServiceName> {
        self.with_status(ServiceStatus::is_deployed)
    }

    pub fn deployed_count(&self) -> usize {
        self.deployed().len()
    }

    pub fn skipped(&self) -> Vec<&ServiceName> {
        self.with_status(|s| *s == ServiceStatus::Skipped)
    }

    /// `(service, load balancer)` for every deployed load balancer.
    pub fn load_balancers(&self) -> &[(ServiceName, LoadBalancer)] {
        &self.load_balancers
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ServiceName, ServiceStatus)> {
        self.services.iter().map(|(s, status)| (s, *status))
    }

    fn with_status(&self, pred: impl Fn(&ServiceStatus) -> bool) -> Vec<&ServiceName> {
        self.services
            .iter()
            .filter(|(_, status)| pred(status))
            .map(|(s, _)| s)
            .collect()
    }
}
