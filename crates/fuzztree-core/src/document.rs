//! Nested, serde-friendly form of a tree.
//!
//! External binding layers hand trees over as a [`TreeDocument`]; the arena
//! form is built from it with [`TreeDocument::into_tree`]. The reverse
//! direction is used to export instantiated trees and to fingerprint models.

use serde::{Deserialize, Serialize};

use crate::builder::TreeBuilder;
use crate::error::{DocumentError, TreeError};
use crate::tree::node::{Node, NodeIndex, NodeKind};
use crate::tree::VariabilityTree;

/// A whole tree in nested form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decomposition_number: Option<u32>,
    pub top_event: NodeDocument,
}

/// One node and its subtree in nested form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "NodeKind::intermediate")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDocument>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl NodeDocument {
    fn to_node(&self) -> Node {
        Node {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            optional: self.optional,
            cost: self.cost,
            children: Vec::new(),
            parent: None,
        }
    }
}

impl TreeDocument {
    /// Parse a JSON document and build the arena tree.
    pub fn parse_json(json: &str) -> Result<VariabilityTree, DocumentError> {
        let doc: TreeDocument = serde_json::from_str(json)?;
        Ok(doc.into_tree()?)
    }

    /// Build the arena form, preserving document order.
    pub fn into_tree(self) -> Result<VariabilityTree, TreeError> {
        let mut builder = TreeBuilder::with_root(self.id, self.top_event.to_node())
            .mission_time(self.mission_time)
            .decomposition_number(self.decomposition_number);
        if let Some(name) = self.name {
            builder = builder.name(name);
        }

        let root = builder.root();
        let mut stack: Vec<(NodeIndex, &NodeDocument)> = self
            .top_event
            .children
            .iter()
            .rev()
            .map(|c| (root, c))
            .collect();
        while let Some((parent, doc)) = stack.pop() {
            let idx = builder.add(parent, doc.to_node())?;
            stack.extend(doc.children.iter().rev().map(|c| (idx, c)));
        }

        Ok(builder.build())
    }

    /// Convert an arena tree back into nested form.
    pub fn from_tree(tree: &VariabilityTree) -> Self {
        TreeDocument {
            id: tree.id.clone(),
            name: tree.name.clone(),
            mission_time: tree.mission_time,
            decomposition_number: tree.decomposition_number,
            top_event: node_document(tree, tree.root()),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn node_document(tree: &VariabilityTree, idx: NodeIndex) -> NodeDocument {
    let node = &tree.nodes[idx];
    NodeDocument {
        id: node.id.clone(),
        name: node.name.clone(),
        kind: node.kind.clone(),
        optional: node.optional,
        cost: node.cost,
        children: node
            .children
            .iter()
            .map(|&c| node_document(tree, c))
            .collect(),
    }
}
