//! CLI command implementations.

pub mod analyze;
pub mod configurations;
pub mod inspect;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fuzztree_core::{TreeDocument, TreeError, VariabilityTree};
use tracing::warn;

/// Output format shared by the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

impl Format {
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("human") | Some("text") => Ok(Format::Human),
            Some("json") => Ok(Format::Json),
            Some(other) => bail!("unknown format '{other}' (expected human or json)"),
        }
    }
}

/// Read and build a tree document, warning about every invariant violation.
///
/// A tree with violations still loads: the configurations that reach a
/// malformed node are reported invalid one by one.
pub fn load_tree(path: &Path) -> Result<VariabilityTree> {
    if !path.exists() {
        bail!("tree file not found: {}", path.display());
    }
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let tree =
        TreeDocument::parse_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    report_violations(&tree);
    Ok(tree)
}

fn report_violations(tree: &VariabilityTree) -> Vec<TreeError> {
    let violations = tree.validate().err().unwrap_or_default();
    for violation in &violations {
        warn!(tree = %tree.id, "{violation}");
    }
    violations
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!(Format::parse(None).unwrap(), Format::Human);
        assert_eq!(Format::parse(Some("json")).unwrap(), Format::Json);
        assert!(Format::parse(Some("xml")).is_err());
    }

    #[test]
    fn load_tree_from_file() {
        let (_dir, path) = fixtures::write_tree(fixtures::PLANT);
        let tree = load_tree(&path).unwrap();
        assert_eq!(tree.id, "plant");
        assert!(tree.has_variation());
    }

    #[test]
    fn violations_reported_but_tree_loads() {
        let (_dir, path) = fixtures::write_tree(
            r#"{
                "id": "t",
                "top_event": {
                    "id": "top",
                    "children": [
                        {"id": "r",
                         "kind": {"variation_point": {"redundancy": {"from": 3, "to": 1, "formula": "N"}}},
                         "children": [
                            {"id": "e", "kind": {"event": {"basic": {"probability": {"crisp": {"value": 0.1}}}}}}
                         ]},
                        {"id": "f", "kind": {"variation_point": "feature"}}
                    ]
                }
            }"#,
        );
        let tree = load_tree(&path).unwrap();

        let violations = report_violations(&tree);
        assert_eq!(violations.len(), 3);
        assert!(violations.contains(&TreeError::EmptyFeature("f".into())));
        assert!(violations
            .iter()
            .any(|v| matches!(v, TreeError::RedundancyBounds { from: 3, to: 1, .. })));

        let (_dir, path) = fixtures::write_tree(fixtures::PLANT);
        assert!(report_violations(&load_tree(&path).unwrap()).is_empty());
    }

    #[test]
    fn missing_and_malformed_files() {
        let (dir, path) = fixtures::write_tree("{ not json");
        let err = load_tree(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));

        let err = load_tree(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
