// ABOUTME: Manifest documents, their discovery on disk and YAML decoding.
// ABOUTME: Documents stay untyped trees; only the fields rules touch get accessors.

mod decode;
mod document;
mod kind;
mod source;

pub use decode::{DecodeError, decode_documents, decode_file};
pub use document::ManifestDocument;
pub use kind::ResourceKind;
pub use source::{ManifestSource, PresenceEntry, PresenceReport};
