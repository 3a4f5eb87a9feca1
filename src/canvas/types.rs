//! Canvas graph type definitions
//!
//! These are the nodes the editor places on the canvas. Field names follow
//! the editor's JSON (`type`, `position`, `data.templateType`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::manifest::template::TemplateKind;

/// Canvas coordinates; presentation only
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One workflow template placed on the canvas
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
    /// Unique id, assigned once when the node is created
    pub id: String,
    /// Node renderer the editor uses
    #[serde(rename = "type", alias = "kind")]
    pub kind: TemplateKind,
    #[serde(default)]
    pub position: Position,
    #[serde(alias = "payload")]
    pub data: NodeData,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            kind: data.template_kind,
            position,
            data,
        }
    }
}

fn empty_config() -> Value {
    Value::Object(Map::new())
}

/// Payload of a canvas node
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Display label and emitted template name
    pub name: String,
    /// Decides which template kind the node exports as
    #[serde(rename = "templateType", alias = "templateKind")]
    pub template_kind: TemplateKind,
    /// Kind-specific configuration. Not checked against the kind; usually a
    /// record, but any value is carried through.
    #[serde(default = "empty_config")]
    pub config: Value,
    /// Template-level fields other than the name and kind, e.g. `inputs`
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub template_fields: Map<String, Value>,
}

impl NodeData {
    pub fn new(name: impl Into<String>, template_kind: TemplateKind) -> Self {
        Self {
            name: name.into(),
            template_kind,
            config: empty_config(),
            template_fields: Map::new(),
        }
    }

    pub fn with_config(mut self, config: impl Into<Value>) -> Self {
        self.config = config.into();
        self
    }

    pub fn with_template_fields(mut self, fields: Map<String, Value>) -> Self {
        self.template_fields = fields;
        self
    }
}
