// ABOUTME: Validated domain types shared across the pipeline.
// ABOUTME: Service names, namespaces, image references and provider IDs.

mod id;
mod image_ref;
mod namespace;
mod service_name;

pub use id::VpcId;
pub use image_ref::{ImageRef, ParseImageRefError, RegistryUrl};
pub use namespace::{NamespaceName, NamespaceNameError};
pub use service_name::{ServiceName, ServiceNameError};
