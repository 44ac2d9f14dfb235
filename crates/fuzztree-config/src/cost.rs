//! Design cost of a configuration.
//!
//! The cost is the sum of the `cost` of every template node the configuration
//! selects. Event sets count once per copy, using the redundancy `n` when the
//! set sits under a redundancy variation point.

use fuzztree_core::{Node, NodeIndex, NodeKind, VariabilityTree, VariationPointKind};

use crate::configuration::Configuration;

/// Total cost of `config` over `tree`.
pub fn configuration_cost(tree: &VariabilityTree, config: &Configuration) -> u64 {
    u64::from(tree.root_node().cost) + children_cost(tree, tree.root(), config)
}

fn children_cost(tree: &VariabilityTree, idx: NodeIndex, config: &Configuration) -> u64 {
    tree.children(idx)
        .filter(|(_, child)| config.selects(child))
        .map(|(ci, child)| node_cost(tree, ci, child, config))
        .sum()
}

fn node_cost(tree: &VariabilityTree, idx: NodeIndex, node: &Node, config: &Configuration) -> u64 {
    match &node.kind {
        NodeKind::VariationPoint(VariationPointKind::Redundancy { .. }) => {
            let n = config.redundancy_count(&node.id).map(|choice| choice.n);
            u64::from(node.cost)
                + tree
                    .children(idx)
                    .filter(|(_, child)| config.selects(child))
                    .map(|(ci, child)| match child.kind {
                        NodeKind::EventSet(_) => event_set_cost(tree, ci, child, config, n),
                        _ => node_cost(tree, ci, child, config),
                    })
                    .sum::<u64>()
        }
        NodeKind::EventSet(_) => event_set_cost(tree, idx, node, config, None),
        _ => u64::from(node.cost) + children_cost(tree, idx, config),
    }
}

fn event_set_cost(
    tree: &VariabilityTree,
    idx: NodeIndex,
    node: &Node,
    config: &Configuration,
    copies_override: Option<u32>,
) -> u64 {
    let copies = match &node.kind {
        NodeKind::EventSet(set) => copies_override.or(set.quantity()).unwrap_or(0),
        _ => 1,
    };
    u64::from(copies) * (u64::from(node.cost) + children_cost(tree, idx, config))
}
