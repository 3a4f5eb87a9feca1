//! Workflow document → canvas graph
//!
//! Imported nodes are laid out left to right on one row; the editor lets
//! the user move them afterwards.

use super::ids::IdGenerator;
use super::types::{GraphNode, NodeData, Position};
use crate::manifest::types::WorkflowDocument;

const LAYOUT_ORIGIN_X: f64 = 100.0;
const LAYOUT_ROW_Y: f64 = 100.0;
const LAYOUT_SPACING_X: f64 = 250.0;

/// Default canvas position of the `index`-th imported template
pub fn layout_position(index: usize) -> Position {
    Position::new(LAYOUT_ORIGIN_X + index as f64 * LAYOUT_SPACING_X, LAYOUT_ROW_Y)
}

/// One canvas node per template, in document order, with ids drawn from `ids`
pub fn workflow_to_nodes<G: IdGenerator + ?Sized>(
    doc: &WorkflowDocument,
    ids: &mut G,
) -> Vec<GraphNode> {
    let nodes: Vec<GraphNode> = doc
        .spec
        .templates
        .iter()
        .enumerate()
        .map(|(index, template)| {
            let data = NodeData::new(template.name.clone(), template.kind())
                .with_config(template.body.to_value())
                .with_template_fields(template.fields());
            GraphNode::new(ids.next_id(), layout_position(index), data)
        })
        .collect();

    log::debug!(
        "Imported {} templates from workflow '{}'",
        nodes.len(),
        doc.metadata.name
    );
    nodes
}
