//! The variability tree: an immutable arena of nodes.
//!
//! Nodes are stored in a flat vector and addressed by [`NodeIndex`]. Children
//! are ordered index lists and every node except the root records its parent
//! index. A tree is only produced by [`TreeBuilder`](crate::builder::TreeBuilder)
//! and never mutated afterwards, so it can be shared freely across analysis
//! threads.

pub mod node;

use std::collections::HashMap;

use self::node::{EventSetKind, Node, NodeIndex, NodeKind, VariationPointKind};
use crate::error::TreeError;

/// An immutable fault tree, possibly containing variation points.
#[derive(Debug, Clone, PartialEq)]
pub struct VariabilityTree {
    /// Model identifier.
    pub id: String,
    pub name: Option<String>,
    /// Mission time applied to failure rates without their own override.
    pub mission_time: Option<f64>,
    /// Number of alpha levels requested for decomposed results.
    pub decomposition_number: Option<u32>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeIndex,
    pub(crate) index: HashMap<String, NodeIndex>,
}

impl VariabilityTree {
    /// Index of the top event.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The top event node.
    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Look up a node by index.
    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Look up a node index by id.
    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.find(id).map(|idx| &self.nodes[idx])
    }

    /// Ordered children of a node.
    pub fn children(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.nodes
            .get(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&c| (c, &self.nodes[c]))
    }

    /// Parent of a node, if any.
    pub fn parent(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx)?.parent.map(|p| &self.nodes[p])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Pre-order indices of the subtree rooted at `idx`, including `idx`.
    pub fn subtree(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Ids of the subtree rooted at `idx`, including `idx` itself.
    pub fn subtree_ids(&self, idx: NodeIndex) -> Vec<&str> {
        self.subtree(idx)
            .into_iter()
            .map(|i| self.nodes[i].id.as_str())
            .collect()
    }

    /// Whether the tree contains any variation point or optional node.
    pub fn has_variation(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| n.kind.is_variation_point() || n.optional)
    }

    /// Check the structural invariants, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<TreeError>> {
        let mut errors = Vec::new();

        for node in &self.nodes {
            match &node.kind {
                NodeKind::VariationPoint(VariationPointKind::Redundancy { from, to, .. }) => {
                    if *from < 0 || *to < 0 || from > to {
                        errors.push(TreeError::RedundancyBounds {
                            id: node.id.clone(),
                            from: *from,
                            to: *to,
                        });
                    }
                    let event_set_children = node
                        .children
                        .iter()
                        .filter(|&&c| self.nodes[c].kind.is_event_set())
                        .count();
                    if node.children.len() != 1 || event_set_children != 1 {
                        errors.push(TreeError::RedundancyChild {
                            id: node.id.clone(),
                            found: describe_children(self, node),
                        });
                    }
                }
                NodeKind::VariationPoint(VariationPointKind::Feature) => {
                    if node.children.is_empty() {
                        errors.push(TreeError::EmptyFeature(node.id.clone()));
                    }
                }
                NodeKind::EventSet(set) => {
                    if set.quantity() == Some(0) {
                        errors.push(TreeError::ZeroQuantity(node.id.clone()));
                    }
                    if matches!(set, EventSetKind::Intermediate { .. }) && node.children.len() != 1
                    {
                        errors.push(TreeError::EventSetTemplate(node.id.clone()));
                    }
                }
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn describe_children(tree: &VariabilityTree, node: &Node) -> String {
    if node.children.is_empty() {
        return "no children".into();
    }
    node.children
        .iter()
        .map(|&c| tree.nodes[c].kind.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
