//! Building variability-free trees from a template and a configuration.
//!
//! Children are processed in document order:
//!
//! - excluded nodes and disabled inclusion decisions are skipped,
//! - a redundancy point becomes a `VOTING_OR(k)` gate carrying the point's id,
//!   whose children are `n` copies of its event set,
//! - a feature point is replaced by its selected child,
//! - an inclusion variation point splices its children into the parent,
//! - an event set expands into `quantity` copies,
//! - everything else is copied and processed recursively.
//!
//! Copies of an event set are suffixed `.0`, `.1`, ...; inside a copy of an
//! intermediate set the suffix is applied to every descendant id.

use fuzztree_core::{
    EventSetKind, GateKind, Node, NodeIndex, NodeKind, TreeBuilder, VariabilityTree,
    VariationPointKind,
};

use crate::configuration::Configuration;
use crate::error::StructuralError;

/// Instantiates concrete trees from one template.
pub struct TreeInstantiator<'a> {
    template: &'a VariabilityTree,
}

impl<'a> TreeInstantiator<'a> {
    pub fn new(template: &'a VariabilityTree) -> Self {
        Self { template }
    }

    /// Build the variability-free tree selected by `config`.
    ///
    /// The result's id is the template id suffixed with the configuration id.
    pub fn instantiate(&self, config: &Configuration) -> Result<VariabilityTree, StructuralError> {
        let template_root = self.template.root_node();
        let mut builder = TreeBuilder::with_root(
            format!("{}.{}", self.template.id, config.id()),
            copy_node(template_root, ""),
        )
        .mission_time(self.template.mission_time)
        .decomposition_number(self.template.decomposition_number);
        if let Some(name) = &self.template.name {
            builder = builder.name(name.clone());
        }

        let root = builder.root();
        self.expand_children(config, self.template.root(), root, "", &mut builder)?;
        Ok(builder.build())
    }

    fn expand_children(
        &self,
        config: &Configuration,
        template_idx: NodeIndex,
        parent: NodeIndex,
        suffix: &str,
        builder: &mut TreeBuilder,
    ) -> Result<(), StructuralError> {
        for (idx, child) in self.template.children(template_idx) {
            if config.selects(child) {
                self.expand_node(config, idx, child, parent, suffix, builder)?;
            }
        }
        Ok(())
    }

    fn expand_node(
        &self,
        config: &Configuration,
        idx: NodeIndex,
        node: &Node,
        parent: NodeIndex,
        suffix: &str,
        builder: &mut TreeBuilder,
    ) -> Result<(), StructuralError> {
        match &node.kind {
            NodeKind::VariationPoint(VariationPointKind::Redundancy { .. }) => {
                let choice = config
                    .redundancy_count(&node.id)
                    .ok_or_else(|| StructuralError::MissingResolution(node.id.clone()))?;
                let (set_idx, set) = self.single_child(idx, node)?;
                if !set.kind.is_event_set() {
                    return Err(StructuralError::WrongChildType {
                        id: node.id.clone(),
                        expected: "an event set",
                        found: set.kind.to_string(),
                    });
                }
                if !config.selects(set) {
                    return Ok(());
                }

                let mut gate = Node::new(
                    suffixed(&node.id, suffix),
                    NodeKind::Gate(GateKind::VotingOr { k: choice.k }),
                );
                gate.name = node.name.clone();
                let gate = builder.add(parent, gate)?;
                self.expand_event_set(config, set_idx, set, gate, Some(choice.n), suffix, builder)
            }
            NodeKind::VariationPoint(VariationPointKind::Feature) => {
                let chosen = config
                    .featured_child(&node.id)
                    .ok_or_else(|| StructuralError::MissingResolution(node.id.clone()))?;
                let (chosen_idx, chosen_node) = self
                    .template
                    .children(idx)
                    .find(|(_, c)| c.id == chosen)
                    .ok_or_else(|| StructuralError::InvalidAttribute {
                        id: node.id.clone(),
                        attribute: "feature choice",
                        detail: format!("'{chosen}' is not a child"),
                    })?;
                if !config.selects(chosen_node) {
                    return Ok(());
                }
                self.expand_node(config, chosen_idx, chosen_node, parent, suffix, builder)
            }
            NodeKind::VariationPoint(VariationPointKind::Inclusion { .. }) => {
                self.expand_children(config, idx, parent, suffix, builder)
            }
            NodeKind::EventSet(_) => {
                self.expand_event_set(config, idx, node, parent, None, suffix, builder)
            }
            _ => {
                let copy = builder.add(parent, copy_node(node, suffix))?;
                self.expand_children(config, idx, copy, suffix, builder)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn expand_event_set(
        &self,
        config: &Configuration,
        idx: NodeIndex,
        set: &Node,
        parent: NodeIndex,
        copies_override: Option<u32>,
        suffix: &str,
        builder: &mut TreeBuilder,
    ) -> Result<(), StructuralError> {
        let NodeKind::EventSet(kind) = &set.kind else {
            return Err(StructuralError::WrongChildType {
                id: set.id.clone(),
                expected: "an event set",
                found: set.kind.to_string(),
            });
        };
        let copies = copies_override
            .or(kind.quantity())
            .filter(|&q| q > 0)
            .ok_or_else(|| StructuralError::InvalidAttribute {
                id: set.id.clone(),
                attribute: "quantity",
                detail: "missing or zero".into(),
            })?;

        match kind {
            EventSetKind::Basic { probability, .. } => {
                for i in 0..copies {
                    let mut event = Node::new(
                        format!("{}{suffix}.{i}", set.id),
                        NodeKind::basic(probability.clone()),
                    )
                    .with_cost(set.cost);
                    event.name = set.name.clone();
                    builder.add(parent, event)?;
                }
            }
            EventSetKind::Intermediate { .. } => {
                let (template_idx, template) = self.single_child(idx, set)?;
                if !config.selects(template) {
                    return Ok(());
                }
                for i in 0..copies {
                    let copy_suffix = format!("{suffix}.{i}");
                    self.expand_node(config, template_idx, template, parent, &copy_suffix, builder)?;
                }
            }
        }
        Ok(())
    }

    fn single_child(&self, idx: NodeIndex, node: &Node) -> Result<(NodeIndex, &'a Node), StructuralError> {
        let mut children = self.template.children(idx);
        match (children.next(), children.next()) {
            (Some(only), None) => Ok(only),
            _ => Err(StructuralError::WrongChildNum {
                id: node.id.clone(),
                expected: "exactly one",
                found: node.children().len(),
            }),
        }
    }
}

fn suffixed(id: &str, suffix: &str) -> String {
    format!("{id}{suffix}")
}

fn copy_node(node: &Node, suffix: &str) -> Node {
    let mut copy = Node::new(suffixed(&node.id, suffix), node.kind.clone()).with_cost(node.cost);
    copy.name = node.name.clone();
    copy
}
