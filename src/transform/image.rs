// ABOUTME: Rewrites container images that name a logical service.
// ABOUTME: `cart` or `cart:<tag>` becomes the service's pushed registry reference.

use serde_yaml::Value;
use std::sync::Arc;

use super::Rule;
use crate::images::ImageTable;
use crate::manifest::ManifestDocument;

pub struct ImageRewrite {
    table: Arc<ImageTable>,
}

impl ImageRewrite {
    pub fn new(table: Arc<ImageTable>) -> Self {
        Self { table }
    }
}

impl Rule for ImageRewrite {
    fn name(&self) -> &'static str {
        "image-rewrite"
    }

    fn apply(&self, document: &mut ManifestDocument) -> bool {
        let mut changed = false;

        for container in document.containers_mut() {
            let Some(image) = container.get("image").and_then(Value::as_str) else {
                continue;
            };
            let Some((service, resolved)) = self.table.lookup(image) else {
                continue;
            };

            tracing::debug!("Rewriting image {} -> {} ({})", image, resolved, service);
            let resolved = resolved.to_string();
            container.insert(Value::from("image"), Value::from(resolved));
            changed = true;
        }

        changed
    }
}
