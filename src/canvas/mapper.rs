// SPDX-License-Identifier: MIT

//! Canvas graph → workflow document
//!
//! The mapping is total: every node becomes exactly one template, in canvas
//! order, and nothing is validated here.

use super::types::GraphNode;
use crate::manifest::template::TemplateBody;
use crate::manifest::types::{
    TemplateDefinition, WorkflowDocument, DEFAULT_ENTRYPOINT, DEFAULT_NAMESPACE,
};

/// Settings applied to every exported document
#[derive(Debug, Clone, PartialEq)]
pub struct MapperOptions {
    /// `metadata.namespace` of the exported workflow; omitted when `None`
    pub namespace: Option<String>,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            namespace: Some(DEFAULT_NAMESPACE.to_string()),
        }
    }
}

/// Maps canvas nodes to workflow documents
#[derive(Debug, Clone, Default)]
pub struct GraphMapper {
    options: MapperOptions,
}

impl GraphMapper {
    pub fn new(options: MapperOptions) -> Self {
        Self { options }
    }

    /// Build the document for `nodes`.
    ///
    /// The entrypoint is the first node's name, or `main` for an empty
    /// canvas. Duplicate names are emitted as-is.
    pub fn map(&self, nodes: &[GraphNode], workflow_name: &str) -> WorkflowDocument {
        let mut doc = WorkflowDocument::new(workflow_name);
        doc.metadata.namespace = self.options.namespace.clone();

        let entrypoint = nodes
            .first()
            .map(|node| node.data.name.clone())
            .unwrap_or_else(|| DEFAULT_ENTRYPOINT.to_string());
        doc.spec.entrypoint = Some(entrypoint);

        doc.spec.templates = nodes.iter().map(node_to_template).collect();

        log::debug!(
            "Mapped {} canvas nodes to workflow '{}'",
            nodes.len(),
            workflow_name
        );
        doc
    }
}

fn node_to_template(node: &GraphNode) -> TemplateDefinition {
    let body = TemplateBody::from_value(node.data.template_kind, &node.data.config);
    TemplateDefinition::new(node.data.name.clone(), body).with_fields(&node.data.template_fields)
}

/// Map with the default options (namespace `default`)
pub fn nodes_to_workflow(nodes: &[GraphNode], workflow_name: &str) -> WorkflowDocument {
    GraphMapper::default().map(nodes, workflow_name)
}
