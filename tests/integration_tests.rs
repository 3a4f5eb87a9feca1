//! Integration tests for canvas export and manifest import
//!
//! These exercise the full canvas → manifest → canvas flow through the
//! public API only.

use argo_canvas_rs::canvas::ids::SequentialIds;
use argo_canvas_rs::canvas::{nodes_to_workflow, workflow_to_nodes, GraphNode, NodeData, Position};
use argo_canvas_rs::manifest::template::{
    ContainerConfig, SuspendTemplate, TemplateBody, TemplateKind,
};
use argo_canvas_rs::manifest::types::{TemplateDefinition, DEFAULT_ENTRYPOINT};
use argo_canvas_rs::manifest::{validate, ManifestLoader, WorkflowDocument};
use argo_canvas_rs::pipeline;
use serde_json::{json, Map, Value};

// ============================================================================
// Helpers
// ============================================================================

fn editor_node(value: Value) -> GraphNode {
    serde_json::from_value(value).expect("Invalid editor node")
}

fn record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn node(id: &str, name: &str, kind: TemplateKind, config: Value) -> GraphNode {
    GraphNode::new(
        id,
        Position::default(),
        NodeData::new(name, kind).with_config(record(config)),
    )
}

/// One node of every kind, wired together by a DAG and a steps template
fn every_kind() -> Vec<GraphNode> {
    vec![
        node(
            "node-0",
            "main",
            TemplateKind::Dag,
            json!({"tasks": [
                {"name": "build", "template": "build"},
                {"name": "deploy", "template": "deploy", "dependencies": ["build"]}
            ]}),
        ),
        node(
            "node-1",
            "build",
            TemplateKind::Container,
            json!({
                "image": "golang:1.22",
                "command": ["go", "build"],
                "args": ["./..."],
                "env": [{"name": "CGO_ENABLED", "value": "0"}],
                "resources": {"requests": {"cpu": "100m", "memory": "128Mi"}, "limits": {"cpu": "1"}}
            }),
        ),
        node(
            "node-2",
            "deploy",
            TemplateKind::Steps,
            json!({"steps": [
                [{"name": "render", "template": "render"}],
                [{"name": "apply", "template": "apply"}, {"name": "gate", "template": "gate"}]
            ]}),
        ),
        node(
            "node-3",
            "render",
            TemplateKind::Script,
            json!({"image": "python:3.12", "source": "import sys\nprint(sys.argv)\n", "command": ["python"]}),
        ),
        node(
            "node-4",
            "apply",
            TemplateKind::Resource,
            json!({"action": "create", "manifest": "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: out\n"}),
        ),
        node("node-5", "gate", TemplateKind::Suspend, json!({"ignored": true})),
    ]
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_single_container_scenario() {
    let nodes = vec![editor_node(json!({
        "id": "node-0",
        "type": "container",
        "position": {"x": 0, "y": 0},
        "data": {
            "name": "hello",
            "templateType": "container",
            "config": {"image": "alpine:latest", "command": ["echo", "hello"]}
        }
    }))];

    let doc = nodes_to_workflow(&nodes, "my-workflow");
    assert_eq!(doc.metadata.name, "my-workflow");
    assert_eq!(doc.spec.entrypoint.as_deref(), Some("hello"));
    assert_eq!(
        doc.spec.templates,
        vec![TemplateDefinition::new(
            "hello",
            TemplateBody::Container(ContainerConfig {
                image: Some("alpine:latest".to_string()),
                command: Some(vec!["echo".to_string(), "hello".to_string()]),
                ..Default::default()
            })
        )]
    );

    assert!(validate(&doc).errors.is_empty());

    let text = ManifestLoader::render(&doc).expect("Failed to render");
    let parsed = ManifestLoader::parse(&text).expect("Failed to parse rendered manifest");
    assert_eq!(parsed, doc);

    let as_json = serde_json::to_value(&parsed.spec.templates).unwrap();
    assert_eq!(
        as_json,
        json!([{"name": "hello", "container": {"image": "alpine:latest", "command": ["echo", "hello"]}}])
    );
}

#[test]
fn test_entrypoint_rules() {
    let doc = nodes_to_workflow(&[], "x");
    assert_eq!(doc.spec.entrypoint.as_deref(), Some(DEFAULT_ENTRYPOINT));

    let nodes = every_kind();
    let doc = nodes_to_workflow(&nodes[1..3], "x");
    assert_eq!(doc.spec.entrypoint.as_deref(), Some("build"));
}

#[test]
fn test_every_kind_exports_one_kind_field() {
    let nodes = every_kind();
    let doc = nodes_to_workflow(&nodes, "pipeline");
    assert_eq!(doc.spec.templates.len(), nodes.len());

    let rendered = serde_json::to_value(&doc.spec.templates).unwrap();
    let kind_keys = ["container", "dag", "steps", "script", "resource", "suspend"];
    for (template, node) in rendered.as_array().unwrap().iter().zip(&nodes) {
        let present: Vec<&str> = kind_keys
            .iter()
            .copied()
            .filter(|key| template.get(*key).is_some())
            .collect();
        assert_eq!(present, vec![node.data.template_kind.as_str()]);
    }

    assert_eq!(
        doc.template("gate").unwrap().body,
        TemplateBody::Suspend(SuspendTemplate {})
    );
}

#[test]
fn test_every_kind_round_trips_through_yaml() {
    let doc = nodes_to_workflow(&every_kind(), "pipeline");
    let text = ManifestLoader::render(&doc).unwrap();
    assert!(text.contains("suspend: {}"));
    assert!(!text.contains("ignored"));
    assert_eq!(ManifestLoader::parse(&text).unwrap(), doc);
}

#[test]
fn test_export_pipeline_is_advisory() {
    let result = pipeline::export(&[], "").unwrap();
    assert!(!result.report.valid);
    assert_eq!(
        result.report.errors,
        vec![
            "Missing required field: metadata.name",
            "Workflow must have at least one template",
        ]
    );
    assert!(result.manifest.starts_with("apiVersion: argoproj.io/v1alpha1"));
}

// ============================================================================
// Manifests written for Argo
// ============================================================================

const ARGO_MANIFEST: &str = r#"
apiVersion: argoproj.io/v1alpha1
kind: Workflow
metadata:
  name: gpu-train
  generateName: gpu-train-
  namespace: ml
  labels:
    team: vision
spec:
  entrypoint: main
  serviceAccountName: runner
  arguments:
    parameters:
      - name: epochs
        value: "10"
  templates:
    - name: main
      dag:
        tasks:
          - name: prepare
            template: fetch
          - name: train
            template: train
            depends: prepare.Succeeded
            arguments:
              parameters:
                - name: epochs
                  value: "{{workflow.parameters.epochs}}"
    - name: fetch
      steps:
        - - name: download
            template: train
            when: "{{workflow.parameters.epochs}} > 0"
    - name: train
      inputs:
        parameters:
          - name: epochs
      outputs:
        artifacts:
          - name: model
            path: /out/model.pt
      retryStrategy:
        limit: 2
      container:
        image: pytorch/pytorch:2.3
        imagePullPolicy: Always
        env:
          - name: EPOCHS
            value: "{{inputs.parameters.epochs}}"
          - name: TOKEN
            valueFrom:
              secretKeyRef:
                name: hub
                key: token
        resources:
          limits:
            cpu: "4"
            nvidia.com/gpu: 1
"#;

fn as_json(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).expect("Invalid YAML")
}

#[test]
fn test_argo_manifest_survives_parse_and_render() {
    let doc = ManifestLoader::parse(ARGO_MANIFEST).unwrap();
    let rendered = ManifestLoader::render(&doc).unwrap();
    assert_eq!(as_json(&rendered), as_json(ARGO_MANIFEST));

    assert_eq!(doc.metadata.extra["labels"], json!({"team": "vision"}));
    let train = doc.template("train").unwrap();
    assert!(train.inputs.is_some());
    assert!(train.outputs.is_some());
    assert!(matches!(train.body, TemplateBody::Container(_)));
    assert!(matches!(
        doc.template("fetch").unwrap().body,
        TemplateBody::Verbatim {
            kind: TemplateKind::Steps,
            ..
        }
    ));
}

#[test]
fn test_argo_manifest_survives_import_and_export() {
    let doc = ManifestLoader::parse(ARGO_MANIFEST).unwrap();
    let nodes = pipeline::import(ARGO_MANIFEST, &mut SequentialIds::new()).unwrap();

    // metadata and spec-level fields belong to the document, not the canvas
    let exported = nodes_to_workflow(&nodes, &doc.metadata.name);
    assert_eq!(exported.spec.templates, doc.spec.templates);

    let train = &nodes[2];
    assert_eq!(train.data.config["env"][1]["valueFrom"]["secretKeyRef"]["key"], "token");
    assert_eq!(train.data.config["resources"]["limits"]["nvidia.com/gpu"], 1);
    assert_eq!(train.data.template_fields["retryStrategy"], json!({"limit": 2}));
    assert_eq!(
        nodes[0].data.config["tasks"][1]["depends"],
        "prepare.Succeeded"
    );
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validator_completeness() {
    assert_eq!(validate(&WorkflowDocument::default()).errors.len(), 4);

    let minimal = ManifestLoader::parse(
        r#"{"apiVersion": "v1", "kind": "Workflow", "metadata": {"name": "w"}, "spec": {"templates": [{"name": "t", "container": {}}]}}"#,
    )
    .unwrap();
    let report = validate(&minimal);
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_import_restores_nodes() {
    let source_nodes = every_kind();
    let text = ManifestLoader::render(&nodes_to_workflow(&source_nodes, "pipeline")).unwrap();

    let imported = pipeline::import(&text, &mut SequentialIds::new()).unwrap();
    assert_eq!(imported.len(), source_nodes.len());

    for (index, (restored, source)) in imported.iter().zip(&source_nodes).enumerate() {
        assert_eq!(restored.id, format!("node-{}", index));
        assert_eq!(restored.data.name, source.data.name);
        assert_eq!(restored.data.template_kind, source.data.template_kind);
        assert_eq!(restored.position, Position::new(100.0 + 250.0 * index as f64, 100.0));
    }

    // configs come back as written, except suspend which never carries one
    assert_eq!(imported[1].data.config, source_nodes[1].data.config);
    assert_eq!(imported[3].data.config, source_nodes[3].data.config);
    assert_eq!(imported[5].data.config, json!({}));
}

#[test]
fn test_import_then_export_is_stable() {
    let doc = nodes_to_workflow(&every_kind(), "pipeline");
    let nodes = workflow_to_nodes(&doc, &mut SequentialIds::new());
    let again = nodes_to_workflow(&nodes, "pipeline");
    assert_eq!(again, doc);
}

#[test]
fn test_import_without_templates() {
    let nodes = pipeline::import("apiVersion: argoproj.io/v1alpha1\nkind: Workflow\n", &mut SequentialIds::new())
        .unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn test_import_malformed_manifest() {
    let result = pipeline::import("metadata:\n  name: [x\n", &mut SequentialIds::new());
    assert!(result.is_err());
}
