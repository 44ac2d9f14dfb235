use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fuzztree_analysis::settings::{self, AnalysisSettings};
use fuzztree_analysis::{run_batch, BatchReport};
use tracing::debug;

use super::{load_tree, Format};

/// Command-line overrides for the analysis settings.
#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub alpha: Option<f64>,
    pub decomposition: Option<u32>,
    pub mission_time: Option<f64>,
    pub sequential: bool,
    pub settings: Option<PathBuf>,
}

pub fn run(cwd: &Path, input: &Path, options: &AnalyzeOptions, format: Option<&str>) -> Result<()> {
    let format = Format::parse(format)?;
    let tree = load_tree(input)?;
    let settings = resolve_settings(cwd, options)?;

    let report = run_batch(&tree, &settings);
    print!("{}", render(&report, format)?);
    Ok(())
}

/// Explicit settings file, then `fuzztree.toml` in `cwd`, then defaults;
/// command-line flags win over all of them.
pub fn resolve_settings(cwd: &Path, options: &AnalyzeOptions) -> Result<AnalysisSettings> {
    let mut resolved = match &options.settings {
        Some(path) => settings::load_settings_toml(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => settings::discover_settings(cwd)?.unwrap_or_default(),
    };

    if let Some(alpha) = options.alpha {
        resolved.alpha = Some(alpha);
    }
    if let Some(levels) = options.decomposition {
        resolved.decomposition_number = Some(levels);
    }
    if let Some(mission_time) = options.mission_time {
        resolved.mission_time = mission_time;
    }
    if options.sequential {
        resolved.parallel = false;
    }

    settings::require_valid(&resolved)?;
    debug!(?resolved, "analysis settings");
    Ok(resolved)
}

fn render(report: &BatchReport, format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        Format::Human => Ok(report.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    #[test]
    fn defaults_without_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_settings(dir.path(), &AnalyzeOptions::default()).unwrap();
        assert_eq!(resolved, AnalysisSettings::default());
    }

    #[test]
    fn flags_override_discovered_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(settings::SETTINGS_FILE),
            "mission-time = 10.0\nalpha = 0.5\n",
        )
        .unwrap();

        let options = AnalyzeOptions {
            alpha: Some(0.25),
            sequential: true,
            ..AnalyzeOptions::default()
        };
        let resolved = resolve_settings(dir.path(), &options).unwrap();
        assert_eq!(resolved.mission_time, 10.0);
        assert_eq!(resolved.alpha, Some(0.25));
        assert!(!resolved.parallel);
    }

    #[test]
    fn invalid_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalyzeOptions {
            alpha: Some(1.5),
            ..AnalyzeOptions::default()
        };
        assert!(resolve_settings(dir.path(), &options).is_err());
    }

    #[test]
    fn missing_explicit_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalyzeOptions {
            settings: Some(dir.path().join("nope.toml")),
            ..AnalyzeOptions::default()
        };
        let err = resolve_settings(dir.path(), &options).unwrap_err();
        assert!(format!("{err:#}").contains("loading settings"));
    }

    #[test]
    fn renders_human_and_json() {
        let (dir, path) = fixtures::write_tree(fixtures::PLANT);
        let tree = load_tree(&path).unwrap();
        let settings = resolve_settings(dir.path(), &AnalyzeOptions::default()).unwrap();
        let report = run_batch(&tree, &settings);

        // b optional (2) x redundancy 2..3 (2).
        assert_eq!(report.entries.len(), 4);

        let human = render(&report, Format::Human).unwrap();
        assert!(human.contains("=== Analysis Report ==="));
        assert!(human.contains("4 (4 valid, 0 invalid)"));

        let json: serde_json::Value =
            serde_json::from_str(&render(&report, Format::Json).unwrap()).unwrap();
        assert_eq!(json["tree_id"], "plant");
        assert_eq!(json["entries"].as_array().unwrap().len(), 4);
    }
}
