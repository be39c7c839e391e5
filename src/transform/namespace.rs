// ABOUTME: Places recognised resources into the target namespace.
// ABOUTME: Idempotent: a document already in the namespace is left untouched.

use super::Rule;
use crate::manifest::ManifestDocument;
use crate::types::NamespaceName;

pub struct NamespaceInjection {
    namespace: NamespaceName,
}

impl NamespaceInjection {
    pub fn new(namespace: NamespaceName) -> Self {
        Self { namespace }
    }
}

impl Rule for NamespaceInjection {
    fn name(&self) -> &'static str {
        "namespace-injection"
    }

    fn apply(&self, document: &mut ManifestDocument) -> bool {
        if !document.kind().is_recognized() {
            return false;
        }
        document.set_namespace(self.namespace.as_str())
    }
}
