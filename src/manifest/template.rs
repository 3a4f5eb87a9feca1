// SPDX-License-Identifier: MIT

//! Template kinds and their per-kind configuration records
//!
//! Every field of a configuration record is optional, and keys the record
//! does not know about are kept in `extra` so they pass through the
//! canvas → manifest mapping untouched.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The closed set of template kinds a canvas node can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Container,
    Dag,
    Steps,
    Script,
    Resource,
    Suspend,
}

impl TemplateKind {
    /// All kinds, in the priority order used when a template definition
    /// carries more than one kind field
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Container,
        TemplateKind::Dag,
        TemplateKind::Steps,
        TemplateKind::Script,
        TemplateKind::Resource,
        TemplateKind::Suspend,
    ];

    /// Manifest field name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Container => "container",
            TemplateKind::Dag => "dag",
            TemplateKind::Steps => "steps",
            TemplateKind::Script => "script",
            TemplateKind::Resource => "resource",
            TemplateKind::Suspend => "suspend",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown template kind: {}", s))
    }
}

/// A configuration record for one template kind
pub trait KindConfig: Serialize + DeserializeOwned + Default {
    /// Unrecognised keys carried alongside the known fields
    fn extra_mut(&mut self) -> &mut Map<String, Value>;

    /// Build a config from an untyped record.
    ///
    /// Never fails: when a known field has the wrong shape the whole record
    /// is kept verbatim in `extra` instead of being interpreted.
    fn from_record(record: &Map<String, Value>) -> Self {
        match serde_json::from_value(Value::Object(record.clone())) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Passing template config through uninterpreted: {}", err);
                let mut config = Self::default();
                *config.extra_mut() = record.clone();
                config
            }
        }
    }

    /// Convert back to an untyped record
    fn to_record(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(record)) => record,
            _ => Map::new(),
        }
    }
}

/// Environment variable passed to a container.
///
/// `valueFrom` and other sources stay in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// CPU/memory quantities, e.g. `cpu: 100m`, `memory: 128Mi`.
/// Extended resources such as `nvidia.com/gpu` are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ResourceList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resource requests and limits of a container
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Runs a container image
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ContainerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<EnvVar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One task of a DAG template; `depends`, `arguments`, `when` and the like
/// are kept in `extra`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct DagTask {
    pub name: String,
    /// Name of the template this task runs
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Runs other templates as a dependency graph
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct DagConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<DagTask>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One step inside a parallel step group
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct WorkflowStep {
    pub name: String,
    pub template: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Runs groups of steps in order; steps inside a group run in parallel
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct StepsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Vec<WorkflowStep>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Runs inline source in an image
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ScriptConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Operation a resource template performs on its manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceAction {
    Create,
    Apply,
    Delete,
    Patch,
}

/// Applies a cluster resource manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ResourceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ResourceAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Suspend marker; always written as `{}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SuspendTemplate {}

macro_rules! impl_kind_config {
    ($($config:ty),* $(,)?) => {
        $(
            impl KindConfig for $config {
                fn extra_mut(&mut self) -> &mut Map<String, Value> {
                    &mut self.extra
                }
            }
        )*
    };
}

impl_kind_config!(
    ContainerConfig,
    DagConfig,
    StepsConfig,
    ScriptConfig,
    ResourceConfig
);

/// The kind-specific part of a template definition.
///
/// Exactly one kind is populated per template by construction. Written as a
/// single `<kind>: <config>` entry, so it flattens into the template record.
#[derive(Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemplateBody {
    Container(ContainerConfig),
    Dag(DagConfig),
    Steps(StepsConfig),
    Script(ScriptConfig),
    Resource(ResourceConfig),
    Suspend(SuspendTemplate),
    /// A kind field whose value is not a config record, such as Argo's
    /// `steps: [[...]]` list. Written back unchanged.
    #[schemars(skip)]
    Verbatim { kind: TemplateKind, value: Value },
}

impl TemplateBody {
    pub fn kind(&self) -> TemplateKind {
        match self {
            TemplateBody::Container(_) => TemplateKind::Container,
            TemplateBody::Dag(_) => TemplateKind::Dag,
            TemplateBody::Steps(_) => TemplateKind::Steps,
            TemplateBody::Script(_) => TemplateKind::Script,
            TemplateBody::Resource(_) => TemplateKind::Resource,
            TemplateBody::Suspend(_) => TemplateKind::Suspend,
            TemplateBody::Verbatim { kind, .. } => *kind,
        }
    }

    /// Build a body of `kind` from an untyped config record.
    ///
    /// Suspend ignores the record entirely.
    pub fn from_record(kind: TemplateKind, record: &Map<String, Value>) -> Self {
        match kind {
            TemplateKind::Container => TemplateBody::Container(ContainerConfig::from_record(record)),
            TemplateKind::Dag => TemplateBody::Dag(DagConfig::from_record(record)),
            TemplateKind::Steps => TemplateBody::Steps(StepsConfig::from_record(record)),
            TemplateKind::Script => TemplateBody::Script(ScriptConfig::from_record(record)),
            TemplateKind::Resource => TemplateBody::Resource(ResourceConfig::from_record(record)),
            TemplateKind::Suspend => TemplateBody::Suspend(SuspendTemplate {}),
        }
    }

    /// Build a body of `kind` from any config value.
    ///
    /// Records go through [`TemplateBody::from_record`], `null` is an empty
    /// config, and anything else is kept verbatim.
    pub fn from_value(kind: TemplateKind, value: &Value) -> Self {
        match value {
            Value::Object(record) => Self::from_record(kind, record),
            Value::Null => Self::from_record(kind, &Map::new()),
            _ if kind == TemplateKind::Suspend => TemplateBody::Suspend(SuspendTemplate {}),
            other => TemplateBody::Verbatim {
                kind,
                value: other.clone(),
            },
        }
    }

    /// Untyped config record of this body (empty for suspend and for
    /// verbatim values that are not records)
    pub fn to_record(&self) -> Map<String, Value> {
        match self.to_value() {
            Value::Object(record) => record,
            _ => Map::new(),
        }
    }

    /// Config value of this body, as it appears under the kind field
    pub fn to_value(&self) -> Value {
        match self {
            TemplateBody::Container(c) => Value::Object(c.to_record()),
            TemplateBody::Dag(c) => Value::Object(c.to_record()),
            TemplateBody::Steps(c) => Value::Object(c.to_record()),
            TemplateBody::Script(c) => Value::Object(c.to_record()),
            TemplateBody::Resource(c) => Value::Object(c.to_record()),
            TemplateBody::Suspend(_) => Value::Object(Map::new()),
            TemplateBody::Verbatim { value, .. } => value.clone(),
        }
    }
}

impl Serialize for TemplateBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let key = self.kind().as_str();
        match self {
            TemplateBody::Container(c) => map.serialize_entry(key, c)?,
            TemplateBody::Dag(c) => map.serialize_entry(key, c)?,
            TemplateBody::Steps(c) => map.serialize_entry(key, c)?,
            TemplateBody::Script(c) => map.serialize_entry(key, c)?,
            TemplateBody::Resource(c) => map.serialize_entry(key, c)?,
            TemplateBody::Suspend(c) => map.serialize_entry(key, c)?,
            TemplateBody::Verbatim { value, .. } => map.serialize_entry(key, value)?,
        }
        map.end()
    }
}

impl Default for TemplateBody {
    fn default() -> Self {
        TemplateBody::Container(ContainerConfig::default())
    }
}
