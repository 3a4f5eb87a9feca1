// SPDX-License-Identifier: MIT

//! Workflow document types
//!
//! These mirror the manifest accepted by the Argo workflow engine:
//! `apiVersion`, `kind`, `metadata` and a `spec` holding the entrypoint and
//! the template list. Every field defaults when missing so that incomplete
//! manifests can still be parsed and then reported on by the validator.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::template::{TemplateBody, TemplateKind};

pub const API_VERSION: &str = "argoproj.io/v1alpha1";
pub const WORKFLOW_KIND: &str = "Workflow";
/// Entrypoint used when there is no template to start from
pub const DEFAULT_ENTRYPOINT: &str = "main";
pub const DEFAULT_WORKFLOW_NAME: &str = "my-workflow";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Top-level workflow manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: WorkflowMetadata,
    #[serde(default)]
    pub spec: WorkflowSpec,
}

impl WorkflowDocument {
    /// An empty `argoproj.io/v1alpha1` Workflow named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: WORKFLOW_KIND.to_string(),
            metadata: WorkflowMetadata {
                name: name.into(),
                ..Default::default()
            },
            spec: WorkflowSpec::default(),
        }
    }

    /// Look up a template by name
    pub fn template(&self, name: &str) -> Option<&TemplateDefinition> {
        self.spec.templates.iter().find(|t| t.name == name)
    }
}

/// Workflow metadata; `labels`, `generateName`, `annotations` and the rest
/// are kept in `extra`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct WorkflowMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct WorkflowSpec {
    /// Template execution starts from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub templates: Vec<TemplateDefinition>,
    /// `arguments`, `serviceAccountName` and other spec fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One named template of a workflow.
///
/// Written as a flat record, `{name, <kind>: <config>, ...}`. When read back,
/// the kind is taken from the first kind field present in the order of
/// [`TemplateKind::ALL`]; a record without any kind field becomes an empty
/// container. Kind fields after the first are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TemplateDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,
    #[serde(flatten)]
    pub body: TemplateBody,
    /// Other template-level fields (`metadata`, `retryStrategy`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateDefinition {
    pub fn new(name: impl Into<String>, body: TemplateBody) -> Self {
        Self {
            name: name.into(),
            inputs: None,
            outputs: None,
            body,
            extra: Map::new(),
        }
    }

    pub fn kind(&self) -> TemplateKind {
        self.body.kind()
    }

    /// Template-level fields besides the name and the kind field
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = self.extra.clone();
        if let Some(inputs) = &self.inputs {
            fields.insert("inputs".to_string(), inputs.clone());
        }
        if let Some(outputs) = &self.outputs {
            fields.insert("outputs".to_string(), outputs.clone());
        }
        fields
    }

    /// Set the template-level fields from a record like the one
    /// [`TemplateDefinition::fields`] returns.
    ///
    /// `name` and kind fields are skipped; the template already has them.
    pub fn with_fields(mut self, fields: &Map<String, Value>) -> Self {
        for (key, value) in fields {
            match key.as_str() {
                "inputs" => self.inputs = Some(value.clone()),
                "outputs" => self.outputs = Some(value.clone()),
                key if is_reserved_field(key) => {
                    log::warn!("Ignoring template field '{}' of '{}'", key, self.name);
                }
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
        self
    }
}

fn is_reserved_field(key: &str) -> bool {
    key == "name" || key.parse::<TemplateKind>().is_ok()
}

impl<'de> Deserialize<'de> for TemplateDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawTemplateDefinition::deserialize(deserializer).map(TemplateDefinition::from)
    }
}

/// Template record as it appears in manifest text, with every kind field optional
#[derive(Debug, Deserialize)]
struct RawTemplateDefinition {
    #[serde(default)]
    name: String,
    inputs: Option<Value>,
    outputs: Option<Value>,
    container: Option<Value>,
    dag: Option<Value>,
    steps: Option<Value>,
    script: Option<Value>,
    resource: Option<Value>,
    suspend: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawTemplateDefinition {
    fn field(&self, kind: TemplateKind) -> Option<&Value> {
        match kind {
            TemplateKind::Container => self.container.as_ref(),
            TemplateKind::Dag => self.dag.as_ref(),
            TemplateKind::Steps => self.steps.as_ref(),
            TemplateKind::Script => self.script.as_ref(),
            TemplateKind::Resource => self.resource.as_ref(),
            TemplateKind::Suspend => self.suspend.as_ref(),
        }
    }
}

impl From<RawTemplateDefinition> for TemplateDefinition {
    fn from(raw: RawTemplateDefinition) -> Self {
        let populated = TemplateKind::ALL
            .into_iter()
            .find_map(|kind| raw.field(kind).map(|value| (kind, value)));

        let body = match populated {
            Some((kind, value)) => {
                let body = TemplateBody::from_value(kind, value);
                if matches!(body, TemplateBody::Verbatim { .. }) {
                    log::debug!(
                        "Template '{}' has a non-record {} field; keeping it verbatim",
                        raw.name,
                        kind
                    );
                }
                body
            }
            None => TemplateBody::default(),
        };

        TemplateDefinition {
            body,
            name: raw.name,
            inputs: raw.inputs,
            outputs: raw.outputs,
            extra: raw.extra,
        }
    }
}
