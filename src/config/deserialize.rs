// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles namespaces, registry URLs and the non-empty services list.

use nonempty::NonEmpty;
use serde::Deserialize;

use super::service::{ServiceEntry, ServiceEntryRaw};
use crate::types::{NamespaceName, RegistryUrl};

pub fn deserialize_namespace<'de, D>(deserializer: D) -> Result<NamespaceName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NamespaceName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_namespace_option<'de, D>(
    deserializer: D,
) -> Result<Option<NamespaceName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| NamespaceName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_registry_url<'de, D>(deserializer: D) -> Result<RegistryUrl, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    RegistryUrl::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_services<'de, D>(deserializer: D) -> Result<NonEmpty<ServiceEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<ServiceEntryRaw> = Vec::deserialize(deserializer)?;
    let services = values
        .into_iter()
        .map(ServiceEntryRaw::into_entry)
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    for (i, entry) in services.iter().enumerate() {
        if services[..i].iter().any(|other| other.name == entry.name) {
            return Err(serde::de::Error::custom(format!(
                "duplicate service: {}",
                entry.name
            )));
        }
    }

    NonEmpty::from_vec(services)
        .ok_or_else(|| serde::de::Error::custom("at least one service is required"))
}
