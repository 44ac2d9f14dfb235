//! Configuration space generation.
//!
//! Walks the template depth-first in document order and multiplies the
//! configuration list at every variation point:
//!
//! - an inclusion decision splits each eligible configuration into an
//!   included and an excluded variant; included variants go to the front so
//!   the first configuration is always the all-included default,
//! - a redundancy point yields one configuration per surviving `(k, N)`,
//! - a feature point yields one configuration per child, excluding the
//!   siblings.
//!
//! Malformed variation points are reported to the issue sink and skipped;
//! configurations that reach them later fail at instantiation.

use fuzztree_core::{
    EventSetKind, Issue, IssueScope, IssueSink, Node, NodeIndex, NodeKind, VariabilityTree,
    VariationPointKind,
};
use tracing::{debug, warn};

use crate::configuration::{Configuration, KOutOfN};
use crate::cost::configuration_cost;
use crate::error::StructuralError;
use crate::formula::Formula;
use crate::ids::IdGenerator;

/// Enumerates the configurations of a template tree.
pub struct ConfigurationSpaceGenerator<'a> {
    tree: &'a VariabilityTree,
    sink: &'a IssueSink,
}

impl<'a> ConfigurationSpaceGenerator<'a> {
    pub fn new(tree: &'a VariabilityTree, sink: &'a IssueSink) -> Self {
        Self { tree, sink }
    }

    /// Generate the ordered configuration list with ids starting at 0.
    pub fn generate(&self) -> Vec<Configuration> {
        self.generate_with(&mut IdGenerator::new())
    }

    /// Generate the ordered configuration list, drawing ids from `ids`.
    ///
    /// The result is never empty and depends only on the tree.
    pub fn generate_with(&self, ids: &mut IdGenerator) -> Vec<Configuration> {
        let mut configs = vec![Configuration::default()];
        self.expand(self.tree.root(), &mut configs);

        for config in &mut configs {
            config.set_id(ids.next_id());
            config.set_cost(configuration_cost(self.tree, config));
        }
        debug!(tree = %self.tree.id, count = configs.len(), "generated configurations");
        configs
    }

    fn expand(&self, parent: NodeIndex, configs: &mut Vec<Configuration>) {
        let Some(parent_node) = self.tree.node(parent) else {
            return;
        };

        for (idx, child) in self.tree.children(parent) {
            if child.is_optional() {
                self.expand_inclusion(parent_node, idx, child, configs);
            }

            match &child.kind {
                NodeKind::VariationPoint(VariationPointKind::Redundancy { from, to, formula }) => {
                    self.expand_redundancy(child, *from, *to, formula, configs);
                }
                NodeKind::VariationPoint(VariationPointKind::Feature) => {
                    self.expand_feature(idx, child, configs);
                }
                // Variation inside a set template is resolved once for all copies.
                NodeKind::EventSet(EventSetKind::Intermediate { .. }) => {}
                kind if kind.is_leaf() => continue,
                _ => {}
            }

            self.expand(idx, configs);
        }
    }

    fn expand_inclusion(
        &self,
        parent: &Node,
        idx: NodeIndex,
        node: &Node,
        configs: &mut Vec<Configuration>,
    ) {
        let mut enabled = Vec::new();
        for config in configs.iter_mut() {
            if !config.is_included(&node.id) || !config.is_included(&parent.id) {
                continue;
            }
            let mut copy = config.clone();
            copy.set_optional(&node.id, true);
            config.set_optional(&node.id, false);
            config.exclude_subtree(self.tree, idx);
            enabled.push(copy);
        }
        enabled.append(configs);
        *configs = enabled;
    }

    fn expand_redundancy(
        &self,
        node: &Node,
        from: i64,
        to: i64,
        formula: &str,
        configs: &mut Vec<Configuration>,
    ) {
        if from < 0 || to < 0 || from > to {
            self.structural(
                node,
                StructuralError::InvalidAttribute {
                    id: node.id.clone(),
                    attribute: "bounds",
                    detail: format!("{from}..{to}"),
                },
            );
            return;
        }

        let formula = match Formula::parse(formula) {
            Ok(f) => f,
            Err(err) => {
                self.structural(
                    node,
                    StructuralError::InvalidAttribute {
                        id: node.id.clone(),
                        attribute: "formula",
                        detail: format!("'{formula}': {err}"),
                    },
                );
                return;
            }
        };

        let mut choices = Vec::new();
        for n in from..=to {
            let k = match formula.eval(n) {
                Ok(k) => k,
                Err(err) => {
                    self.structural(
                        node,
                        StructuralError::InvalidAttribute {
                            id: node.id.clone(),
                            attribute: "formula",
                            detail: format!("'{formula}' at N={n}: {err}"),
                        },
                    );
                    return;
                }
            };
            if k <= 0 {
                warn!(id = %node.id, n, k, "dropping redundancy branch with non-positive vote count");
                self.sink.record(
                    IssueScope::Tree,
                    Issue::warning(format!(
                        "redundancy branch N={n} dropped: '{formula}' gives k={k}"
                    ))
                    .at(&node.id),
                );
                continue;
            }
            match (u32::try_from(k), u32::try_from(n)) {
                (Ok(k), Ok(n)) => choices.push(KOutOfN { k, n }),
                _ => {
                    self.structural(
                        node,
                        StructuralError::InvalidAttribute {
                            id: node.id.clone(),
                            attribute: "bounds",
                            detail: format!("k={k}, N={n} exceed the supported range"),
                        },
                    );
                    return;
                }
            }
        }

        if choices.is_empty() {
            warn!(id = %node.id, "every redundancy branch was dropped");
            self.sink.record(
                IssueScope::Tree,
                Issue::warning("no redundancy branch has a positive vote count").at(&node.id),
            );
            return;
        }

        let mut expanded = Vec::with_capacity(configs.len() * choices.len());
        for config in configs.drain(..) {
            if !config.is_included(&node.id) {
                expanded.push(config);
                continue;
            }
            for &choice in &choices {
                let mut copy = config.clone();
                copy.set_redundancy(&node.id, choice);
                expanded.push(copy);
            }
        }
        *configs = expanded;
    }

    fn expand_feature(&self, idx: NodeIndex, node: &Node, configs: &mut Vec<Configuration>) {
        let options: Vec<(NodeIndex, &str)> = self
            .tree
            .children(idx)
            .map(|(ci, c)| (ci, c.id.as_str()))
            .collect();
        if options.is_empty() {
            self.structural(
                node,
                StructuralError::WrongChildNum {
                    id: node.id.clone(),
                    expected: "at least one",
                    found: 0,
                },
            );
            return;
        }

        let mut expanded = Vec::with_capacity(configs.len() * options.len());
        for config in configs.drain(..) {
            if !config.is_included(&node.id) {
                expanded.push(config);
                continue;
            }
            for &(_, chosen) in &options {
                let mut copy = config.clone();
                copy.set_feature(&node.id, chosen);
                for &(other, other_id) in &options {
                    if other_id != chosen {
                        copy.exclude_subtree(self.tree, other);
                    }
                }
                expanded.push(copy);
            }
        }
        *configs = expanded;
    }

    fn structural(&self, node: &Node, err: StructuralError) {
        warn!(id = %node.id, error = %err, "malformed variation point");
        self.sink
            .record(IssueScope::Tree, Issue::fatal(err.to_string()).at(&node.id));
    }
}
