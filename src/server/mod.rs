// SPDX-License-Identifier: MIT

//! HTTP adapter for the canvas editor
//!
//! The editor posts its nodes to `/api/export` and shows the returned
//! manifest and validation errors; `/api/import` turns pasted YAML back into
//! canvas nodes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::canvas::ids::UuidIds;
use crate::canvas::mapper::{GraphMapper, MapperOptions};
use crate::canvas::types::GraphNode;
use crate::config::Settings;
use crate::error::{CanvasError, ManifestError};
use crate::manifest::loader::ManifestLoader;
use crate::manifest::schema;
use crate::manifest::validator::{SchemaValidator, ValidationRules};
use crate::pipeline::Pipeline;

/// Shared, read-only state of the server
pub struct AppState {
    pipeline: Pipeline,
    validator: SchemaValidator,
    default_workflow_name: String,
}

impl AppState {
    pub fn new(settings: &Settings, rules: ValidationRules) -> Self {
        let mapper = GraphMapper::new(MapperOptions {
            namespace: settings.namespace.clone(),
        });
        let validator = SchemaValidator::new(rules);
        Self {
            pipeline: Pipeline::new(mapper, validator.clone()),
            validator,
            default_workflow_name: settings.workflow_name.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/export", post(export_workflow))
        .route("/api/import", post(import_workflow))
        .route("/api/validate", post(validate_manifest))
        .route("/api/schema", get(manifest_schema))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(settings: Settings, rules: ValidationRules) -> Result<(), CanvasError> {
    let app = router(Arc::new(AppState::new(&settings, rules)));

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportRequest {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    workflow_name: Option<String>,
}

async fn export_workflow(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExportRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = payload
        .workflow_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.default_workflow_name.clone());

    match state.pipeline.export(&payload.nodes, &name) {
        Ok(result) => Ok(Json(json!({
            "yaml": result.manifest,
            "valid": result.report.valid,
            "errors": result.report.errors,
        }))),
        Err(e) => {
            log::error!("Export of '{}' failed: {}", name, e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, &e))
        }
    }
}

#[derive(Deserialize)]
struct ManifestRequest {
    yaml: String,
}

async fn import_workflow(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ManifestRequest>,
) -> Result<Json<Value>, ApiError> {
    match state.pipeline.import(&payload.yaml, &mut UuidIds) {
        Ok(nodes) => Ok(Json(json!({ "nodes": nodes }))),
        Err(e) => Err(error_response(StatusCode::BAD_REQUEST, &e)),
    }
}

async fn validate_manifest(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ManifestRequest>,
) -> Result<Json<Value>, ApiError> {
    match ManifestLoader::parse(&payload.yaml) {
        Ok(doc) => {
            let report = state.validator.validate(&doc);
            Ok(Json(json!({ "valid": report.valid, "errors": report.errors })))
        }
        Err(e) => Err(error_response(StatusCode::BAD_REQUEST, &e)),
    }
}

async fn manifest_schema() -> Json<Value> {
    Json(json!(schema::manifest_schema()))
}

fn error_response(status: StatusCode, err: &ManifestError) -> ApiError {
    let mut body = json!({ "error": err.to_string() });
    if let Some((line, column)) = err.location() {
        body["line"] = json!(line);
        body["column"] = json!(column);
    }
    (status, Json(body))
}
