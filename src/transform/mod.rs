// ABOUTME: Rewrite rules applied to every manifest document before submission.
// ABOUTME: Rules run in a fixed order: image rewrite, namespace injection, type override.

mod image;
mod namespace;
mod service_type;

pub use image::ImageRewrite;
pub use namespace::NamespaceInjection;
pub use service_type::ServiceTypeOverride;

use std::sync::Arc;

use crate::images::ImageTable;
use crate::manifest::ManifestDocument;
use crate::types::NamespaceName;

/// A rewrite over one document. Documents are never shared, so rules mutate
/// in place and report whether anything changed.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, document: &mut ManifestDocument) -> bool;
}

/// The ordered rule list.
pub struct TransformEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl TransformEngine {
    /// Build the standard rule order.
    ///
    /// Takes the table by `Arc` so an engine can only exist once every image
    /// build has resolved into a concrete table.
    pub fn new(
        table: Arc<ImageTable>,
        namespace: NamespaceName,
        expose: Option<ServiceTypeOverride>,
    ) -> Self {
        let mut rules: Vec<Box<dyn Rule>> = vec![
            Box::new(ImageRewrite::new(table)),
            Box::new(NamespaceInjection::new(namespace)),
        ];
        if let Some(expose) = expose {
            rules.push(Box::new(expose));
        }
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply every rule in order. Returns the names of rules that changed
    /// the document.
    pub fn apply(&self, document: &mut ManifestDocument) -> Vec<&'static str> {
        let changed: Vec<&'static str> = self
            .rules
            .iter()
            .filter_map(|rule| rule.apply(document).then(|| rule.name()))
            .collect();

        if !changed.is_empty() {
            tracing::debug!(
                "{} {}: applied {}",
                document.kind(),
                document.name().unwrap_or("<unnamed>"),
                changed.join(", ")
            );
        }
        changed
    }
}
