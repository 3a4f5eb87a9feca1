// SPDX-License-Identifier: MIT

//! Workflow manifests
//!
//! The document model exported to the workflow engine, its YAML form, and
//! the structural checks applied before export.

pub mod loader;
pub mod schema;
pub mod template;
pub mod types;
pub mod validator;

pub use loader::ManifestLoader;
pub use template::{TemplateBody, TemplateKind};
pub use types::{TemplateDefinition, WorkflowDocument};
pub use validator::{validate, SchemaValidator, ValidationReport, ValidationRules};
