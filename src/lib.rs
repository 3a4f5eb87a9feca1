// SPDX-License-Identifier: MIT

//! Visual workflow canvas → Argo workflow manifest
//!
//! Canvas nodes are mapped to a [`manifest::WorkflowDocument`], checked by
//! the structural validator and rendered as YAML; manifests can be parsed
//! and mapped back to canvas nodes.

pub mod canvas;
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod server;

pub use error::{CanvasError, ManifestError};
