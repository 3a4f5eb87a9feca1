// SPDX-License-Identifier: MIT

//! Typed error handling for argo-canvas-rs
//!
//! Mapping between the canvas graph and a workflow document never fails.
//! Errors only come from reading/writing manifest text, configuration and
//! the outer surfaces (CLI, HTTP).

use thiserror::Error;

/// Top-level error type for argo-canvas-rs
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Manifest parsing/rendering errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration errors (invalid env vars, bad flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors (canvas graph boundary)
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the document serializer
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Text is not a well-formed workflow manifest
    #[error("Failed to parse manifest: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// Document could not be written as YAML
    #[error("Failed to render manifest: {0}")]
    Render(#[source] serde_yaml::Error),

    /// Manifest file could not be read
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Line/column of a parse error, when the YAML parser reported one
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Parse(err) => err.location().map(|loc| (loc.line(), loc.column())),
            _ => None,
        }
    }
}

impl CanvasError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
