// SPDX-License-Identifier: MIT

//! Canvas graph and its mapping to and from workflow documents

pub mod ids;
pub mod importer;
pub mod mapper;
pub mod types;

pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use importer::workflow_to_nodes;
pub use mapper::{nodes_to_workflow, GraphMapper, MapperOptions};
pub use types::{GraphNode, NodeData, Position};
