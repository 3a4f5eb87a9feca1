// SPDX-License-Identifier: MIT

//! Structural validation of workflow documents
//!
//! The default rules only check that the required top-level fields are
//! present. They do not check template-name uniqueness, that DAG/steps
//! references resolve, or the shape of kind-specific configs. The first two
//! can be switched on through [`ValidationRules`]; doing so changes which
//! documents are reported as valid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::template::{TemplateBody, TemplateKind, WorkflowStep};
use super::types::WorkflowDocument;

/// Outcome of validating a document. Advisory: export proceeds either way.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Optional checks on top of the required-field contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct ValidationRules {
    /// Report templates sharing a name
    #[serde(default)]
    pub unique_template_names: bool,
    /// Report DAG tasks and steps naming a template that does not exist
    #[serde(default)]
    pub resolve_references: bool,
}

impl ValidationRules {
    /// Every optional check switched on
    pub fn strict() -> Self {
        Self {
            unique_template_names: true,
            resolve_references: true,
        }
    }
}

/// Stateless validator configured at construction
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    rules: ValidationRules,
}

impl SchemaValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> ValidationRules {
        self.rules
    }

    /// Run every check; a failing check never stops the ones after it
    pub fn validate(&self, doc: &WorkflowDocument) -> ValidationReport {
        let mut errors = Vec::new();

        if doc.api_version.is_empty() {
            errors.push("Missing required field: apiVersion".to_string());
        }

        if doc.kind.is_empty() {
            errors.push("Missing required field: kind".to_string());
        }

        if doc.metadata.name.is_empty() {
            errors.push("Missing required field: metadata.name".to_string());
        }

        if doc.spec.templates.is_empty() {
            errors.push("Workflow must have at least one template".to_string());
        }

        if self.rules.unique_template_names {
            check_unique_names(doc, &mut errors);
        }

        if self.rules.resolve_references {
            check_references(doc, &mut errors);
        }

        if !errors.is_empty() {
            log::debug!(
                "Workflow '{}' failed validation with {} errors",
                doc.metadata.name,
                errors.len()
            );
        }

        ValidationReport::from_errors(errors)
    }
}

/// Validate with the default, required-fields-only rules
pub fn validate(doc: &WorkflowDocument) -> ValidationReport {
    SchemaValidator::default().validate(doc)
}

fn check_unique_names(doc: &WorkflowDocument, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for template in &doc.spec.templates {
        let name = template.name.as_str();
        if !seen.insert(name) && reported.insert(name) {
            errors.push(format!("Duplicate template name: {}", name));
        }
    }
}

fn check_references(doc: &WorkflowDocument, errors: &mut Vec<String>) {
    let names: HashSet<&str> = doc.spec.templates.iter().map(|t| t.name.as_str()).collect();

    for template in &doc.spec.templates {
        let referenced: Vec<String> = match &template.body {
            TemplateBody::Dag(dag) => dag
                .tasks
                .iter()
                .flatten()
                .map(|task| task.template.clone())
                .collect(),
            TemplateBody::Steps(steps) => steps
                .steps
                .iter()
                .flatten()
                .flatten()
                .map(|step| step.template.clone())
                .collect(),
            // Argo's own `steps: [[...]]` form
            TemplateBody::Verbatim {
                kind: TemplateKind::Steps,
                value,
            } => serde_json::from_value::<Vec<Vec<WorkflowStep>>>(value.clone())
                .map(|groups| groups.into_iter().flatten().map(|step| step.template).collect())
                .unwrap_or_default(),
            _ => continue,
        };

        for target in referenced {
            if !names.contains(target.as_str()) {
                errors.push(format!(
                    "Template '{}' references unknown template '{}'",
                    template.name, target
                ));
            }
        }
    }
}
