//! Tree construction API.
//!
//! The `TreeBuilder` is the only way to produce a [`VariabilityTree`]. It
//! assigns arena indices, wires parent links, and rejects duplicate ids during
//! construction so a finished tree always satisfies id uniqueness.
//!
//! # Example
//!
//! ```rust
//! use fuzztree_core::builder::TreeBuilder;
//! use fuzztree_core::probability::ProbabilityRepresentation;
//! use fuzztree_core::tree::node::{GateKind, Node, NodeKind};
//!
//! let mut builder = TreeBuilder::new("pump", "top");
//! let root = builder.root();
//! let or = builder.add(root, Node::new("or", NodeKind::Gate(GateKind::Or))).unwrap();
//! builder
//!     .add(or, Node::new("valve", NodeKind::basic(ProbabilityRepresentation::crisp(0.1))))
//!     .unwrap();
//!
//! let tree = builder.build();
//! assert_eq!(tree.node_count(), 3);
//! ```

use std::collections::HashMap;

use crate::error::TreeError;
use crate::tree::node::{Node, NodeIndex, NodeKind};
use crate::tree::VariabilityTree;

/// Incremental builder for variability trees.
pub struct TreeBuilder {
    id: String,
    name: Option<String>,
    mission_time: Option<f64>,
    decomposition_number: Option<u32>,
    nodes: Vec<Node>,
    index: HashMap<String, NodeIndex>,
}

impl TreeBuilder {
    /// Start a tree whose top event is an intermediate event named `root_id`.
    pub fn new(tree_id: impl Into<String>, root_id: impl Into<String>) -> Self {
        Self::with_root(tree_id, Node::new(root_id, NodeKind::intermediate()))
    }

    /// Start a tree with a caller-supplied top event.
    pub fn with_root(tree_id: impl Into<String>, mut root: Node) -> Self {
        root.children.clear();
        root.parent = None;
        let mut index = HashMap::new();
        index.insert(root.id.clone(), 0);
        Self {
            id: tree_id.into(),
            name: None,
            mission_time: None,
            decomposition_number: None,
            nodes: vec![root],
            index,
        }
    }

    /// Index of the top event.
    pub fn root(&self) -> NodeIndex {
        0
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mission_time(mut self, mission_time: Option<f64>) -> Self {
        self.mission_time = mission_time;
        self
    }

    pub fn decomposition_number(mut self, decomposition_number: Option<u32>) -> Self {
        self.decomposition_number = decomposition_number;
        self
    }

    /// Append `node` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeIndex, mut node: Node) -> Result<NodeIndex, TreeError> {
        if parent >= self.nodes.len() {
            return Err(TreeError::InvalidParent(parent));
        }
        if self.index.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }

        let idx = self.nodes.len();
        node.children.clear();
        node.parent = Some(parent);
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        self.nodes[parent].children.push(idx);
        Ok(idx)
    }

    /// Finish construction.
    pub fn build(self) -> VariabilityTree {
        VariabilityTree {
            id: self.id,
            name: self.name,
            mission_time: self.mission_time,
            decomposition_number: self.decomposition_number,
            nodes: self.nodes,
            root: 0,
            index: self.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::ProbabilityRepresentation;
    use crate::tree::node::GateKind;

    #[test]
    fn duplicate_ids_rejected() {
        let mut b = TreeBuilder::new("t", "top");
        let root = b.root();
        b.add(root, Node::new("e", NodeKind::basic(ProbabilityRepresentation::crisp(0.1))))
            .unwrap();
        let err = b
            .add(root, Node::new("e", NodeKind::Gate(GateKind::And)))
            .unwrap_err();
        assert_eq!(err, TreeError::DuplicateId("e".into()));

        let err = b.add(root, Node::new("top", NodeKind::Gate(GateKind::And))).unwrap_err();
        assert_eq!(err, TreeError::DuplicateId("top".into()));
    }

    #[test]
    fn invalid_parent_rejected() {
        let mut b = TreeBuilder::new("t", "top");
        let err = b.add(7, Node::new("x", NodeKind::Gate(GateKind::Or))).unwrap_err();
        assert_eq!(err, TreeError::InvalidParent(7));
    }

    #[test]
    fn tree_metadata_carried() {
        let tree = TreeBuilder::new("t", "top")
            .name("Pump")
            .mission_time(Some(100.0))
            .decomposition_number(Some(4))
            .build();
        assert_eq!(tree.name.as_deref(), Some("Pump"));
        assert_eq!(tree.mission_time, Some(100.0));
        assert_eq!(tree.decomposition_number, Some(4));
        assert_eq!(tree.root_node().id, "top");
    }
}
