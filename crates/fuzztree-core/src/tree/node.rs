//! Node kinds and the Node struct.
//!
//! A node is a gate, an event, an event set, or a variation point. The kind
//! payload carries everything kind-specific; structure (children, parent)
//! lives in the arena that owns the node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::probability::ProbabilityRepresentation;

/// Position of a node inside its tree arena.
pub type NodeIndex = usize;

/// Static gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    And,
    Or,
    Xor,
    /// At least `k` of the children must fail.
    VotingOr { k: u32 },
}

/// Event kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Basic { probability: ProbabilityRepresentation },
    House,
    Undeveloped,
    Intermediate,
}

/// Templates for `quantity` structurally identical siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSetKind {
    Basic {
        probability: ProbabilityRepresentation,
        #[serde(default)]
        quantity: Option<u32>,
    },
    Intermediate {
        #[serde(default)]
        quantity: Option<u32>,
    },
}

impl EventSetKind {
    pub fn quantity(&self) -> Option<u32> {
        match self {
            EventSetKind::Basic { quantity, .. } | EventSetKind::Intermediate { quantity } => {
                *quantity
            }
        }
    }
}

/// Unresolved design decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationPointKind {
    /// Transparent wrapper whose subtree may be left out.
    Inclusion { optional: bool },
    /// k-out-of-N redundancy over a single event set, N in `from..=to`,
    /// k given by `formula` in the variable `N`.
    Redundancy { from: i64, to: i64, formula: String },
    /// Exactly one child is selected.
    Feature,
}

/// The kind of a tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Gate(GateKind),
    Event(EventKind),
    EventSet(EventSetKind),
    VariationPoint(VariationPointKind),
}

impl NodeKind {
    pub fn basic(probability: ProbabilityRepresentation) -> Self {
        NodeKind::Event(EventKind::Basic { probability })
    }

    pub fn intermediate() -> Self {
        NodeKind::Event(EventKind::Intermediate)
    }

    pub fn is_variation_point(&self) -> bool {
        matches!(self, NodeKind::VariationPoint(_))
    }

    pub fn is_event_set(&self) -> bool {
        matches!(self, NodeKind::EventSet(_))
    }

    /// Leaves end configuration traversal.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Event(EventKind::Basic { .. })
                | NodeKind::Event(EventKind::House)
                | NodeKind::Event(EventKind::Undeveloped)
                | NodeKind::EventSet(_)
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Gate(GateKind::And) => write!(f, "AND"),
            NodeKind::Gate(GateKind::Or) => write!(f, "OR"),
            NodeKind::Gate(GateKind::Xor) => write!(f, "XOR"),
            NodeKind::Gate(GateKind::VotingOr { k }) => write!(f, "VOTING_OR({k})"),
            NodeKind::Event(EventKind::Basic { probability }) => write!(f, "BASIC({probability})"),
            NodeKind::Event(EventKind::House) => write!(f, "HOUSE"),
            NodeKind::Event(EventKind::Undeveloped) => write!(f, "UNDEVELOPED"),
            NodeKind::Event(EventKind::Intermediate) => write!(f, "INTERMEDIATE"),
            NodeKind::EventSet(EventSetKind::Basic { quantity, .. }) => {
                write!(f, "BASIC_SET(x{})", quantity.map_or("?".into(), |q| q.to_string()))
            }
            NodeKind::EventSet(EventSetKind::Intermediate { quantity }) => {
                write!(
                    f,
                    "INTERMEDIATE_SET(x{})",
                    quantity.map_or("?".into(), |q| q.to_string())
                )
            }
            NodeKind::VariationPoint(VariationPointKind::Inclusion { optional }) => {
                write!(f, "INCLUSION(optional={optional})")
            }
            NodeKind::VariationPoint(VariationPointKind::Redundancy { from, to, formula }) => {
                write!(f, "REDUNDANCY({from}..{to}, k={formula})")
            }
            NodeKind::VariationPoint(VariationPointKind::Feature) => write!(f, "FEATURE"),
        }
    }
}

/// A node in a variability tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Identifier, unique within its tree.
    pub id: String,
    /// Human-readable label.
    pub name: Option<String>,
    pub kind: NodeKind,
    /// Inclusion flag: the node may be left out of a configuration.
    pub optional: bool,
    /// Design cost contributed by including this node.
    pub cost: u32,
    pub(crate) children: Vec<NodeIndex>,
    pub(crate) parent: Option<NodeIndex>,
}

impl Node {
    /// Create a detached node; the tree builder wires up its position.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            optional: false,
            cost: 0,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Whether this node is an inclusion decision: either it carries the
    /// optional flag or it is an optional inclusion variation point.
    pub fn is_optional(&self) -> bool {
        self.optional
            || matches!(
                self.kind,
                NodeKind::VariationPoint(VariationPointKind::Inclusion { optional: true })
            )
    }
}
