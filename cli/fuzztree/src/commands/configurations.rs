use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use fuzztree_config::{Configuration, ConfigurationSpaceGenerator};
use fuzztree_core::{Issue, IssueScope, IssueSink};

use super::{load_tree, Format};

pub fn run(input: &Path, format: Option<&str>) -> Result<()> {
    let format = Format::parse(format)?;
    let tree = load_tree(input)?;

    let sink = IssueSink::new();
    let configurations = ConfigurationSpaceGenerator::new(&tree, &sink).generate();
    let issues = sink.for_scope(IssueScope::Tree);

    match format {
        Format::Json => {
            let output = serde_json::json!({
                "tree_id": tree.id,
                "configurations": configurations,
                "issues": issues,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Format::Human => print!("{}", render(&tree.id, &configurations, &issues)),
    }
    Ok(())
}

fn render(tree_id: &str, configurations: &[Configuration], issues: &[Issue]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Configurations of {tree_id} ===");
    for config in configurations {
        let _ = writeln!(out, "  {config}");
    }
    let _ = writeln!(out, "{} configurations", configurations.len());

    if !issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- Issues ({}) ---", issues.len());
        for issue in issues {
            let _ = writeln!(out, "  {issue}");
        }
    }
    out
}
