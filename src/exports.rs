// ABOUTME: Named output values consumed by downstream tooling.
// ABOUTME: Kubeconfig, VPC, registry, deployed services and load balancer endpoints.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

pub const KUBECONFIG: &str = "kubeconfig";
pub const VPC_ID: &str = "vpcId";
pub const REGISTRY_URL: &str = "registryUrl";
pub const DEPLOYED_SERVICES: &str = "deployedServices";
pub const DEPLOYED_COUNT: &str = "deployedCount";

/// Key for a load balancer's external endpoint.
pub fn endpoint_key(service_object: &str) -> String {
    format!("{service_object}_endpoint")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Exports {
    values: BTreeMap<String, Value>,
}

impl Exports {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()? + "\n")?;
        Ok(())
    }
}
