use std::path::Path;

use anyhow::{bail, Context, Result};
use fuzztree_config::{ConfigurationSpaceGenerator, TreeInstantiator};
use fuzztree_core::display::format_tree;
use fuzztree_core::{IssueSink, TreeDocument, VariabilityTree};

use super::{load_tree, Format};

pub fn run(input: &Path, config: Option<usize>, format: Option<&str>) -> Result<()> {
    let format = Format::parse(format)?;
    let template = load_tree(input)?;
    let tree = select(&template, config)?;

    match format {
        Format::Json => println!("{}", TreeDocument::from_tree(&tree).to_json()?),
        Format::Human => print!("{}", format_tree(&tree)),
    }
    Ok(())
}

/// The template itself, or its instance for the configuration at `position`.
fn select(template: &VariabilityTree, position: Option<usize>) -> Result<VariabilityTree> {
    let Some(position) = position else {
        return Ok(template.clone());
    };

    let sink = IssueSink::new();
    let configurations = ConfigurationSpaceGenerator::new(template, &sink).generate();
    let Some(config) = configurations.get(position) else {
        bail!(
            "configuration {position} out of range ({} configurations)",
            configurations.len()
        );
    };

    TreeInstantiator::new(template)
        .instantiate(config)
        .with_context(|| format!("instantiating configuration {config}"))
}
