//! Bottom-up probability propagation over a concrete tree.
//!
//! Each analyzer serves one task: it remembers the first undeveloped event it
//! met and the warnings it raised, so repeated evaluations (one per alpha
//! level) report each problem once.

use std::collections::BTreeSet;

use fuzztree_core::{
    AlphaCut, EventKind, GateKind, Interval, Issue, Node, NodeIndex, NodeKind, VariabilityTree,
};
use tracing::warn;

use crate::error::AnalysisError;
use crate::gates;
use crate::settings::{AnalysisSettings, MAX_XOR_CHILD_LIMIT};

/// Evaluates the top event probability of one variability-free tree.
pub struct ReliabilityAnalyzer<'a> {
    tree: &'a VariabilityTree,
    mission_time: f64,
    xor_child_limit: usize,
    undeveloped: Option<String>,
    warned: BTreeSet<String>,
    warnings: Vec<Issue>,
}

impl<'a> ReliabilityAnalyzer<'a> {
    /// Failure rates use the tree's mission time, falling back to the
    /// settings default; an event's own mission time overrides both.
    pub fn new(tree: &'a VariabilityTree, settings: &AnalysisSettings) -> Self {
        Self {
            tree,
            mission_time: tree.mission_time.unwrap_or(settings.mission_time),
            xor_child_limit: settings.xor_child_limit.min(MAX_XOR_CHILD_LIMIT),
            undeveloped: None,
            warned: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Probability interval of the top event at `alpha` (core when `None`).
    pub fn analyze(&mut self, alpha: Option<f64>) -> Result<Interval, AnalysisError> {
        let alpha = alpha.unwrap_or(1.0);
        if !(0.0..=1.0).contains(&alpha) {
            return Err(AnalysisError::InvalidAlpha(alpha));
        }
        let tree = self.tree;
        let root = tree.root();
        self.evaluate(root, tree.root_node(), alpha)
    }

    /// Evaluate alpha levels `i / levels` for `i = 0..=levels`.
    pub fn decompose(&mut self, levels: u32) -> Result<Vec<AlphaCut>, AnalysisError> {
        (0..=levels)
            .map(|i| {
                let alpha = if levels == 0 {
                    1.0
                } else {
                    f64::from(i) / f64::from(levels)
                };
                Ok(AlphaCut::new(alpha, self.analyze(Some(alpha))?))
            })
            .collect()
    }

    /// Id of the first undeveloped event met, if any.
    pub fn undeveloped_event(&self) -> Option<&str> {
        self.undeveloped.as_deref()
    }

    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Issue> {
        self.warnings
    }

    fn evaluate(&mut self, idx: NodeIndex, node: &Node, alpha: f64) -> Result<Interval, AnalysisError> {
        match &node.kind {
            NodeKind::Event(EventKind::Basic { probability }) => probability
                .alpha_cut(alpha, self.mission_time)
                .map_err(|source| AnalysisError::Probability {
                    id: node.id.clone(),
                    source,
                }),
            NodeKind::Event(EventKind::House) => Ok(Interval::CERTAIN),
            NodeKind::Event(EventKind::Undeveloped) => {
                let first = self.undeveloped.get_or_insert_with(|| node.id.clone());
                Err(AnalysisError::Undeveloped { id: first.clone() })
            }
            NodeKind::Event(EventKind::Intermediate) => {
                let tree = self.tree;
                let mut children = tree.children(idx);
                let Some((first_idx, first)) = children.next() else {
                    return Ok(Interval::CERTAIN);
                };
                if children.next().is_some() {
                    self.warn_once(
                        node,
                        format!(
                            "intermediate event has {} children, only the first is analyzed",
                            node.children().len()
                        ),
                    );
                }
                self.evaluate(first_idx, first, alpha)
            }
            NodeKind::Gate(gate) => {
                if *gate == GateKind::Xor && node.children().len() > self.xor_child_limit {
                    return Err(AnalysisError::XorTooWide {
                        id: node.id.clone(),
                        children: node.children().len(),
                        limit: self.xor_child_limit,
                    });
                }
                let children = self.evaluate_children(idx, alpha)?;
                Ok(match gate {
                    GateKind::And => gates::and(&children),
                    GateKind::Or => gates::or(&children),
                    GateKind::Xor => gates::xor(&children),
                    GateKind::VotingOr { k } => gates::voting_or(&children, *k),
                })
            }
            NodeKind::EventSet(_) | NodeKind::VariationPoint(_) => {
                Err(AnalysisError::UnknownNodeType {
                    id: node.id.clone(),
                    kind: node.kind.to_string(),
                })
            }
        }
    }

    fn evaluate_children(&mut self, idx: NodeIndex, alpha: f64) -> Result<Vec<Interval>, AnalysisError> {
        let tree = self.tree;
        tree.children(idx)
            .map(|(ci, child)| self.evaluate(ci, child, alpha))
            .collect()
    }

    fn warn_once(&mut self, node: &Node, message: String) {
        if self.warned.insert(node.id.clone()) {
            warn!(id = %node.id, "{message}");
            self.warnings.push(Issue::warning(message).at(&node.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzztree_core::{
        DecomposedFuzzyNumber, EventSetKind, ProbabilityRepresentation, TreeBuilder,
    };

    const EPS: f64 = 1e-12;

    fn crisp(p: f64) -> NodeKind {
        NodeKind::basic(ProbabilityRepresentation::crisp(p))
    }

    fn gate_tree(gate: GateKind, children: Vec<NodeKind>) -> VariabilityTree {
        let mut b = TreeBuilder::new("t", "top");
        let g = b.add(b.root(), Node::new("g", NodeKind::Gate(gate))).unwrap();
        for (i, kind) in children.into_iter().enumerate() {
            b.add(g, Node::new(format!("e{i}"), kind)).unwrap();
        }
        b.build()
    }

    fn analyze(tree: &VariabilityTree) -> Result<Interval, AnalysisError> {
        ReliabilityAnalyzer::new(tree, &AnalysisSettings::default()).analyze(None)
    }

    #[test]
    fn gate_values() {
        let and = analyze(&gate_tree(GateKind::And, vec![crisp(0.1), crisp(0.2)])).unwrap();
        assert!((and.lower - 0.02).abs() < EPS);

        let or = analyze(&gate_tree(GateKind::Or, vec![crisp(0.1), crisp(0.2)])).unwrap();
        assert!((or.upper - 0.28).abs() < EPS);

        let vote = analyze(&gate_tree(
            GateKind::VotingOr { k: 2 },
            vec![crisp(0.3), crisp(0.3), crisp(0.3)],
        ))
        .unwrap();
        assert!((vote.lower - 0.216).abs() < EPS);

        let xor = analyze(&gate_tree(GateKind::Xor, vec![crisp(0.3), crisp(0.4)])).unwrap();
        assert!((xor.lower - 0.46).abs() < EPS);
    }

    #[test]
    fn empty_tree_is_certain() {
        let tree = TreeBuilder::new("t", "top").build();
        assert_eq!(analyze(&tree).unwrap(), Interval::CERTAIN);
    }

    #[test]
    fn house_event_is_certain() {
        let tree = gate_tree(GateKind::And, vec![NodeKind::Event(EventKind::House), crisp(0.4)]);
        let r = analyze(&tree).unwrap();
        assert!((r.lower - 0.4).abs() < EPS);
    }

    #[test]
    fn failure_rate_uses_tree_mission_time() {
        let mut b = TreeBuilder::new("t", "top").mission_time(Some(2.0));
        b.add(b.root(), Node::new("e", NodeKind::basic(ProbabilityRepresentation::failure_rate(0.5))))
            .unwrap();
        let tree = b.build();
        let r = analyze(&tree).unwrap();
        assert!((r.lower - (1.0 - (-1.0f64).exp())).abs() < EPS);

        let mut b = TreeBuilder::new("t", "top");
        b.add(b.root(), Node::new("e", NodeKind::basic(ProbabilityRepresentation::failure_rate(0.5))))
            .unwrap();
        let settings = AnalysisSettings {
            mission_time: 4.0,
            ..AnalysisSettings::default()
        };
        let r = ReliabilityAnalyzer::new(&b.build(), &settings).analyze(None).unwrap();
        assert!((r.lower - (1.0 - (-2.0f64).exp())).abs() < EPS);
    }

    #[test]
    fn fuzzy_inputs_follow_alpha() {
        let tree = gate_tree(
            GateKind::Or,
            vec![NodeKind::basic(ProbabilityRepresentation::triangular(0.1, 0.2, 0.3))],
        );
        let mut analyzer = ReliabilityAnalyzer::new(&tree, &AnalysisSettings::default());

        let core = analyzer.analyze(None).unwrap();
        assert!((core.lower - 0.2).abs() < EPS && (core.upper - 0.2).abs() < EPS);

        let support = analyzer.analyze(Some(0.0)).unwrap();
        assert!((support.lower - 0.1).abs() < EPS && (support.upper - 0.3).abs() < EPS);
    }

    #[test]
    fn decomposition_levels() {
        let table = DecomposedFuzzyNumber::new(vec![
            AlphaCut::new(0.0, Interval::bounded(0.1, 0.3)),
            AlphaCut::new(1.0, Interval::point(0.2)),
        ]);
        let tree = gate_tree(
            GateKind::And,
            vec![NodeKind::basic(ProbabilityRepresentation::DecomposedFuzzy(table))],
        );
        let cuts = ReliabilityAnalyzer::new(&tree, &AnalysisSettings::default())
            .decompose(4)
            .unwrap();

        let alphas: Vec<f64> = cuts.iter().map(|c| c.alpha).collect();
        assert_eq!(alphas, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!((cuts[2].interval.lower - 0.15).abs() < EPS);
        assert!((cuts[2].interval.upper - 0.25).abs() < EPS);
    }

    #[test]
    fn undeveloped_reports_first_event() {
        let tree = gate_tree(
            GateKind::Or,
            vec![
                NodeKind::Event(EventKind::Undeveloped),
                NodeKind::Event(EventKind::Undeveloped),
            ],
        );
        let mut analyzer = ReliabilityAnalyzer::new(&tree, &AnalysisSettings::default());
        let err = analyzer.analyze(None).unwrap_err();
        assert_eq!(err, AnalysisError::Undeveloped { id: "e0".into() });
        assert_eq!(analyzer.undeveloped_event(), Some("e0"));

        // A second pass keeps pointing at the first one.
        assert!(analyzer.decompose(2).is_err());
        assert_eq!(analyzer.undeveloped_event(), Some("e0"));
    }

    #[test]
    fn intermediate_with_many_children_warns_once() {
        let mut b = TreeBuilder::new("t", "top");
        b.add(b.root(), Node::new("a", crisp(0.1))).unwrap();
        b.add(b.root(), Node::new("b", crisp(0.9))).unwrap();
        let tree = b.build();

        let mut analyzer = ReliabilityAnalyzer::new(&tree, &AnalysisSettings::default());
        let cuts = analyzer.decompose(3).unwrap();
        assert!(cuts.iter().all(|c| (c.interval.lower - 0.1).abs() < EPS));
        assert_eq!(analyzer.warnings().len(), 1);
        assert_eq!(analyzer.warnings()[0].element_id.as_deref(), Some("top"));
    }

    #[test]
    fn event_sets_are_rejected() {
        let tree = gate_tree(
            GateKind::And,
            vec![NodeKind::EventSet(EventSetKind::Basic {
                probability: ProbabilityRepresentation::crisp(0.1),
                quantity: Some(2),
            })],
        );
        assert!(matches!(
            analyze(&tree),
            Err(AnalysisError::UnknownNodeType { .. })
        ));
    }

    #[test]
    fn wide_xor_refused() {
        let tree = gate_tree(GateKind::Xor, vec![crisp(0.1); 4]);
        let settings = AnalysisSettings {
            xor_child_limit: 3,
            ..AnalysisSettings::default()
        };
        let err = ReliabilityAnalyzer::new(&tree, &settings).analyze(None).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::XorTooWide {
                id: "g".into(),
                children: 4,
                limit: 3
            }
        );
    }

    #[test]
    fn xor_limit_capped_for_unvalidated_settings() {
        let tree = gate_tree(GateKind::Xor, vec![crisp(0.1); 64]);
        let settings = AnalysisSettings {
            xor_child_limit: 64,
            ..AnalysisSettings::default()
        };
        let err = ReliabilityAnalyzer::new(&tree, &settings).analyze(None).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::XorTooWide {
                id: "g".into(),
                children: 64,
                limit: MAX_XOR_CHILD_LIMIT
            }
        );
    }

    #[test]
    fn invalid_alpha_and_probability() {
        let tree = gate_tree(GateKind::And, vec![crisp(1.2)]);
        let mut analyzer = ReliabilityAnalyzer::new(&tree, &AnalysisSettings::default());
        assert!(matches!(
            analyzer.analyze(None),
            Err(AnalysisError::Probability { .. })
        ));
        assert_eq!(
            analyzer.analyze(Some(2.0)),
            Err(AnalysisError::InvalidAlpha(2.0))
        );
    }
}
