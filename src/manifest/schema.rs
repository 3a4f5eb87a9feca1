//! JSON Schema for workflow manifests
//!
//! Generated from the document types, so it always describes exactly what
//! the serializer writes.

use once_cell::sync::Lazy;
use schemars::schema::{RootSchema, Schema};
use schemars::schema_for;

use super::types::WorkflowDocument;

static MANIFEST_SCHEMA: Lazy<RootSchema> = Lazy::new(|| schema_for!(WorkflowDocument));

/// Schema of a whole workflow manifest
pub fn manifest_schema() -> &'static RootSchema {
    &MANIFEST_SCHEMA
}

/// Schema of one named definition, e.g. `ContainerConfig`
pub fn definition(name: &str) -> Option<&'static Schema> {
    MANIFEST_SCHEMA.definitions.get(name)
}

/// Names of every definition referenced by the manifest schema
pub fn definition_names() -> Vec<String> {
    MANIFEST_SCHEMA.definitions.keys().cloned().collect()
}
