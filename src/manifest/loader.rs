//! Manifest loader - YAML rendering and parsing
//!
//! Documents are written in block style with no line wrapping, and without
//! anchors or aliases: every repeated value is spelled out in full.

use super::types::WorkflowDocument;
use crate::error::ManifestError;
use std::fs;
use std::path::Path;

/// Renders workflow documents to YAML manifests and parses them back
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a workflow document from a YAML file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<WorkflowDocument, ManifestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a workflow document from a YAML string
    pub fn parse(content: &str) -> Result<WorkflowDocument, ManifestError> {
        let doc: WorkflowDocument = serde_yaml::from_str(content).map_err(ManifestError::Parse)?;
        log::debug!(
            "Parsed manifest '{}' with {} templates",
            doc.metadata.name,
            doc.spec.templates.len()
        );
        Ok(doc)
    }

    /// Render a workflow document as a YAML manifest
    pub fn render(doc: &WorkflowDocument) -> Result<String, ManifestError> {
        serde_yaml::to_string(doc).map_err(ManifestError::Render)
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}
