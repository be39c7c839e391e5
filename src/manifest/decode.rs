// ABOUTME: Decodes manifest files into documents.
// ABOUTME: Supports multi-document YAML streams and skips empty documents.

use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::ManifestDocument;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("document {index} in {} is not a mapping", .path.display())]
    NotAMapping { path: PathBuf, index: usize },
}

/// Decode every non-empty document in a YAML stream.
pub fn decode_documents(yaml: &str, path: &Path) -> Result<Vec<ManifestDocument>, DecodeError> {
    let mut documents = Vec::new();

    for (index, de) in serde_yaml::Deserializer::from_str(yaml).enumerate() {
        let value = Value::deserialize(de).map_err(|source| DecodeError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        if value.is_null() {
            continue;
        }
        let document = ManifestDocument::from_value(value).ok_or_else(|| {
            DecodeError::NotAMapping {
                path: path.to_path_buf(),
                index,
            }
        })?;
        documents.push(document);
    }

    Ok(documents)
}

pub async fn decode_file(path: &Path) -> Result<Vec<ManifestDocument>, DecodeError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DecodeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    decode_documents(&content, path)
}
