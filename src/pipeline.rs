// SPDX-License-Identifier: MIT

//! End-to-end export and import flows
//!
//! Export: canvas nodes → document → validation (advisory) → YAML.
//! Import: YAML → document → canvas nodes.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::canvas::ids::IdGenerator;
use crate::canvas::importer::workflow_to_nodes;
use crate::canvas::mapper::GraphMapper;
use crate::canvas::types::GraphNode;
use crate::error::{CanvasError, ManifestError};
use crate::manifest::loader::ManifestLoader;
use crate::manifest::types::WorkflowDocument;
use crate::manifest::validator::{SchemaValidator, ValidationReport};

/// What the editor shows after an export
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub document: WorkflowDocument,
    /// Rendered YAML manifest
    pub manifest: String,
    pub report: ValidationReport,
}

/// Export and import with a fixed mapper and validator
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    mapper: GraphMapper,
    validator: SchemaValidator,
}

impl Pipeline {
    pub fn new(mapper: GraphMapper, validator: SchemaValidator) -> Self {
        Self { mapper, validator }
    }

    /// Map, validate and render. The manifest is rendered even when the
    /// report lists errors.
    pub fn export(
        &self,
        nodes: &[GraphNode],
        workflow_name: &str,
    ) -> Result<ExportResult, ManifestError> {
        let document = self.mapper.map(nodes, workflow_name);
        let report = self.validator.validate(&document);
        for error in &report.errors {
            log::warn!("Workflow '{}': {}", workflow_name, error);
        }
        let manifest = ManifestLoader::render(&document)?;

        Ok(ExportResult {
            document,
            manifest,
            report,
        })
    }

    /// Parse `manifest` and map it to fresh canvas nodes
    pub fn import<G: IdGenerator + ?Sized>(
        &self,
        manifest: &str,
        ids: &mut G,
    ) -> Result<Vec<GraphNode>, ManifestError> {
        let document = ManifestLoader::parse(manifest)?;
        Ok(workflow_to_nodes(&document, ids))
    }
}

/// Read a JSON array of canvas nodes, as saved by the editor
pub fn load_nodes<P: AsRef<Path>>(path: P) -> Result<Vec<GraphNode>, CanvasError> {
    let content = fs::read_to_string(&path)?;
    let nodes: Vec<GraphNode> = serde_json::from_str(&content)?;
    log::info!(
        "Loaded {} canvas nodes from {}",
        nodes.len(),
        path.as_ref().display()
    );
    Ok(nodes)
}

/// Export with the default mapper and validator
pub fn export(nodes: &[GraphNode], workflow_name: &str) -> Result<ExportResult, ManifestError> {
    Pipeline::default().export(nodes, workflow_name)
}

/// Import with the default pipeline
pub fn import<G: IdGenerator + ?Sized>(
    manifest: &str,
    ids: &mut G,
) -> Result<Vec<GraphNode>, ManifestError> {
    Pipeline::default().import(manifest, ids)
}
