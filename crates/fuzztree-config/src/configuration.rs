//! One resolution of every variation point in a tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use fuzztree_core::{Node, NodeIndex, VariabilityTree};
use serde::{Deserialize, Serialize};

/// Sequential configuration identifier.
pub type ConfigurationId = u64;

/// A k-out-of-N choice for a redundancy variation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KOutOfN {
    /// Votes needed for the gate to fail.
    pub k: u32,
    /// Number of event set copies.
    pub n: u32,
}

impl fmt::Display for KOutOfN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-of-{}", self.k, self.n)
    }
}

/// A concrete design point.
///
/// Produced by the configuration space generator and never modified after
/// generation. Lookups for ids that were never constrained fall back to
/// "included", "enabled" and "unconstrained".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    id: ConfigurationId,
    cost: u64,
    optional_inclusion: BTreeMap<String, bool>,
    not_included: BTreeSet<String>,
    redundancy: BTreeMap<String, KOutOfN>,
    feature_choice: BTreeMap<String, String>,
}

impl Configuration {
    pub fn id(&self) -> ConfigurationId {
        self.id
    }

    /// Sum of the design costs of everything this configuration includes.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn is_included(&self, id: &str) -> bool {
        !self.not_included.contains(id)
    }

    pub fn is_optional_enabled(&self, id: &str) -> bool {
        self.optional_inclusion.get(id).copied().unwrap_or(true)
    }

    pub fn redundancy_count(&self, id: &str) -> Option<KOutOfN> {
        self.redundancy.get(id).copied()
    }

    pub fn featured_child(&self, id: &str) -> Option<&str> {
        self.feature_choice.get(id).map(String::as_str)
    }

    /// Whether `node` takes part in this configuration: it is included and,
    /// if it is an inclusion decision, enabled.
    pub fn selects(&self, node: &Node) -> bool {
        self.is_included(&node.id) && (!node.is_optional() || self.is_optional_enabled(&node.id))
    }

    pub fn optional_inclusions(&self) -> &BTreeMap<String, bool> {
        &self.optional_inclusion
    }

    pub fn not_included(&self) -> &BTreeSet<String> {
        &self.not_included
    }

    pub fn redundancy_choices(&self) -> &BTreeMap<String, KOutOfN> {
        &self.redundancy
    }

    pub fn feature_choices(&self) -> &BTreeMap<String, String> {
        &self.feature_choice
    }

    // Mutators below are only used while the generator builds the sequence.

    pub(crate) fn set_id(&mut self, id: ConfigurationId) {
        self.id = id;
    }

    pub(crate) fn set_cost(&mut self, cost: u64) {
        self.cost = cost;
    }

    pub(crate) fn set_optional(&mut self, id: &str, enabled: bool) {
        self.optional_inclusion.insert(id.to_string(), enabled);
    }

    /// Mark the node at `idx` and its whole subtree as not included.
    pub(crate) fn exclude_subtree(&mut self, tree: &VariabilityTree, idx: NodeIndex) {
        for id in tree.subtree_ids(idx) {
            self.not_included.insert(id.to_string());
        }
    }

    pub(crate) fn set_redundancy(&mut self, id: &str, choice: KOutOfN) {
        self.redundancy.insert(id.to_string(), choice);
    }

    pub(crate) fn set_feature(&mut self, id: &str, child: &str) {
        self.feature_choice.insert(id.to_string(), child.to_string());
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} (cost {})", self.id, self.cost)?;
        let disabled: Vec<&str> = self
            .optional_inclusion
            .iter()
            .filter(|(_, on)| !**on)
            .map(|(id, _)| id.as_str())
            .collect();
        if !disabled.is_empty() {
            write!(f, " without [{}]", disabled.join(", "))?;
        }
        for (id, choice) in &self.redundancy {
            write!(f, " {id}={choice}")?;
        }
        for (id, child) in &self.feature_choice {
            write!(f, " {id}->{child}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzztree_core::{NodeKind, ProbabilityRepresentation, TreeBuilder};

    #[test]
    fn unconstrained_lookups() {
        let config = Configuration::default();
        assert!(config.is_included("anything"));
        assert!(config.is_optional_enabled("anything"));
        assert_eq!(config.redundancy_count("r"), None);
        assert_eq!(config.featured_child("f"), None);
    }

    #[test]
    fn exclusion_covers_subtree() {
        let mut b = TreeBuilder::new("t", "top");
        let g = b
            .add(b.root(), Node::new("g", NodeKind::intermediate()).optional())
            .unwrap();
        b.add(g, Node::new("e", NodeKind::basic(ProbabilityRepresentation::crisp(0.1))))
            .unwrap();
        let tree = b.build();

        let mut config = Configuration::default();
        config.set_optional("g", false);
        config.exclude_subtree(&tree, g);

        assert!(!config.is_included("g"));
        assert!(!config.is_included("e"));
        assert!(config.is_included("top"));
        assert!(!config.selects(tree.get("g").unwrap()));
    }

    #[test]
    fn display_lists_choices() {
        let mut config = Configuration::default();
        config.set_id(3);
        config.set_optional("pump2", false);
        config.set_redundancy("r", KOutOfN { k: 1, n: 2 });
        config.set_feature("f", "electric");
        assert_eq!(
            config.to_string(),
            "#3 (cost 0) without [pump2] r=1-of-2 f->electric"
        );
    }

    #[test]
    fn serde_shape() {
        let mut config = Configuration::default();
        config.set_redundancy("r", KOutOfN { k: 2, n: 3 });
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["redundancy"]["r"]["k"], 2);
        let back: Configuration = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
