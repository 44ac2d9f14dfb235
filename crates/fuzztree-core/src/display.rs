//! Tree display.
//!
//! Formats a tree as a human-readable ASCII tree:
//! ```text
//! pump (INTERMEDIATE)
//! └── or (OR)
//!     ├── motor (BASIC(p=0.1))
//!     └── seal (BASIC(λ=0.0001)) [optional]
//! ```

use crate::tree::node::{Node, NodeIndex};
use crate::tree::VariabilityTree;

/// Format a tree as a human-readable string, with a trailing node count.
pub fn format_tree(tree: &VariabilityTree) -> String {
    let root = tree.root_node();
    let mut out = format!("{}\n", label(root));

    let children = root.children();
    for (i, &child) in children.iter().enumerate() {
        format_node(&mut out, tree, child, "", i == children.len() - 1);
    }

    out.push_str(&format!("\n{} nodes\n", tree.node_count()));
    out
}

fn format_node(out: &mut String, tree: &VariabilityTree, idx: NodeIndex, prefix: &str, is_last: bool) {
    let Some(node) = tree.node(idx) else {
        return;
    };
    let connector = if is_last { "└── " } else { "├── " };
    out.push_str(&format!("{prefix}{connector}{}\n", label(node)));

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let children = node.children();
    for (i, &child) in children.iter().enumerate() {
        format_node(out, tree, child, &child_prefix, i == children.len() - 1);
    }
}

fn label(node: &Node) -> String {
    let mut s = format!("{} ({})", node.id, node.kind);
    if node.optional {
        s.push_str(" [optional]");
    }
    if node.cost > 0 {
        s.push_str(&format!(" cost={}", node.cost));
    }
    s
}
