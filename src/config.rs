// SPDX-License-Identifier: MIT

//! Runtime settings
//!
//! Read from the environment (a `.env` file is loaded first by `main`).
//! Command-line flags take precedence over these.

use crate::error::CanvasError;
use crate::manifest::types::{DEFAULT_NAMESPACE, DEFAULT_WORKFLOW_NAME};

pub const ENV_WORKFLOW_NAME: &str = "ARGO_CANVAS_WORKFLOW_NAME";
pub const ENV_NAMESPACE: &str = "ARGO_CANVAS_NAMESPACE";
pub const ENV_PORT: &str = "ARGO_CANVAS_PORT";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Name given to exported workflows when none is supplied
    pub workflow_name: String,
    /// `metadata.namespace` of exported workflows; an empty value omits it
    pub namespace: Option<String>,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workflow_name: DEFAULT_WORKFLOW_NAME.to_string(),
            namespace: Some(DEFAULT_NAMESPACE.to_string()),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, CanvasError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CanvasError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(name) = lookup(ENV_WORKFLOW_NAME).filter(|v| !v.trim().is_empty()) {
            settings.workflow_name = name;
        }

        if let Some(namespace) = lookup(ENV_NAMESPACE) {
            settings.namespace = Some(namespace).filter(|v| !v.trim().is_empty());
        }

        if let Some(port) = lookup(ENV_PORT) {
            settings.port = port.trim().parse().map_err(|_| {
                CanvasError::config(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }

        Ok(settings)
    }
}
