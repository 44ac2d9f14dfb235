//! Fault tree model with variation points.
//!
//! A [`VariabilityTree`] is an immutable arena of gates, events, event sets
//! and variation points. Basic events carry a [`ProbabilityRepresentation`]
//! that reduces to an [`Interval`] at a given alpha level. Problems found
//! while generating or analyzing configurations are collected in an
//! [`IssueSink`].

pub mod builder;
pub mod display;
pub mod document;
pub mod error;
pub mod hash;
pub mod issue;
pub mod probability;
pub mod tree;

pub use builder::TreeBuilder;
pub use document::{NodeDocument, TreeDocument};
pub use error::{DocumentError, ProbabilityError, TreeError};
pub use issue::{Issue, IssueScope, IssueSink, Severity};
pub use probability::{AlphaCut, DecomposedFuzzyNumber, Interval, ProbabilityRepresentation};
pub use tree::node::{
    EventKind, EventSetKind, GateKind, Node, NodeIndex, NodeKind, VariationPointKind,
};
pub use tree::VariabilityTree;
