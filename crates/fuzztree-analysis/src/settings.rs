//! Analysis settings stored as `fuzztree.toml`.
//!
//! ```toml
//! mission-time = 8760.0
//! alpha = 0.5
//! decomposition-number = 10
//! xor-child-limit = 16
//! parallel = true
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use fuzztree_core::Issue;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};

/// File name looked up by [`discover_settings`].
pub const SETTINGS_FILE: &str = "fuzztree.toml";

/// Default mission time for failure rates when neither the event nor the
/// tree supplies one.
pub const DEFAULT_MISSION_TIME: f64 = 1.0;

/// Default maximum number of XOR children (the gate costs `2^n` evaluations).
pub const DEFAULT_XOR_CHILD_LIMIT: usize = 20;

/// Hard ceiling for the XOR child limit.
pub const MAX_XOR_CHILD_LIMIT: usize = 30;

/// Knobs for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnalysisSettings {
    pub mission_time: f64,
    /// Alpha level for fuzzy inputs; `None` reads fuzzy numbers at their core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Number of alpha steps for decomposed results; overrides the tree's own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decomposition_number: Option<u32>,
    pub xor_child_limit: usize,
    /// Analyze configurations on the worker pool.
    pub parallel: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            mission_time: DEFAULT_MISSION_TIME,
            alpha: None,
            decomposition_number: None,
            xor_child_limit: DEFAULT_XOR_CHILD_LIMIT,
            parallel: true,
        }
    }
}

/// Load settings from a TOML file.
pub fn load_settings_toml(path: &Path) -> Result<AnalysisSettings> {
    if !path.exists() {
        return Err(SettingsError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_settings_toml(&content)
}

/// Parse settings from a TOML string.
pub fn parse_settings_toml(toml_str: &str) -> Result<AnalysisSettings> {
    let settings: AnalysisSettings = toml::from_str(toml_str)?;
    Ok(settings)
}

/// Serialize settings to pretty TOML.
pub fn settings_to_toml(settings: &AnalysisSettings) -> Result<String> {
    let toml_str = toml::to_string_pretty(settings)?;
    Ok(toml_str)
}

/// Load `fuzztree.toml` from `dir` if it exists.
pub fn discover_settings(dir: &Path) -> Result<Option<AnalysisSettings>> {
    let path = dir.join(SETTINGS_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    load_settings_toml(&path).map(Some)
}

/// Check settings for out-of-range values.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with every problem found.
pub fn validate_settings(settings: &AnalysisSettings) -> std::result::Result<(), Vec<Issue>> {
    let mut issues = Vec::new();

    if !settings.mission_time.is_finite() || settings.mission_time < 0.0 {
        issues.push(Issue::fatal(format!(
            "mission-time {} must be a finite, non-negative number",
            settings.mission_time
        )));
    }

    if let Some(alpha) = settings.alpha {
        if !(0.0..=1.0).contains(&alpha) {
            issues.push(Issue::fatal(format!("alpha {alpha} outside [0, 1]")));
        }
    }

    if settings.decomposition_number == Some(0) {
        issues.push(Issue::warning(
            "decomposition-number 0 disables decomposed results",
        ));
    }

    if settings.xor_child_limit > MAX_XOR_CHILD_LIMIT {
        issues.push(Issue::fatal(format!(
            "xor-child-limit {} exceeds the maximum of {MAX_XOR_CHILD_LIMIT}",
            settings.xor_child_limit
        )));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate and turn fatal problems into a [`SettingsError`].
pub fn require_valid(settings: &AnalysisSettings) -> Result<()> {
    match validate_settings(settings) {
        Ok(()) => Ok(()),
        Err(issues) => {
            let fatal: Vec<String> = issues
                .iter()
                .filter(|i| i.is_fatal())
                .map(|i| i.message.clone())
                .collect();
            if fatal.is_empty() {
                Ok(())
            } else {
                Err(SettingsError::Validation {
                    detail: fatal.join("; "),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let settings = parse_settings_toml("alpha = 0.5").unwrap();
        assert_eq!(settings.alpha, Some(0.5));
        assert_eq!(settings.mission_time, DEFAULT_MISSION_TIME);
        assert_eq!(settings.xor_child_limit, DEFAULT_XOR_CHILD_LIMIT);
        assert!(settings.parallel);

        assert_eq!(parse_settings_toml("").unwrap(), AnalysisSettings::default());
    }

    #[test]
    fn kebab_case_keys() {
        let toml = "mission-time = 8760.0\ndecomposition-number = 4\nparallel = false\n";
        let settings = parse_settings_toml(toml).unwrap();
        assert_eq!(settings.mission_time, 8760.0);
        assert_eq!(settings.decomposition_number, Some(4));
        assert!(!settings.parallel);
    }

    #[test]
    fn toml_round_trip() {
        let settings = AnalysisSettings {
            alpha: Some(0.25),
            decomposition_number: Some(10),
            ..AnalysisSettings::default()
        };
        let text = settings_to_toml(&settings).unwrap();
        assert!(text.contains("decomposition-number = 10"));
        assert_eq!(parse_settings_toml(&text).unwrap(), settings);
    }

    #[test]
    fn validation_collects_every_problem() {
        let settings = AnalysisSettings {
            mission_time: -1.0,
            alpha: Some(1.5),
            xor_child_limit: 64,
            ..AnalysisSettings::default()
        };
        let issues = validate_settings(&settings).unwrap_err();
        assert_eq!(issues.len(), 3);
        assert!(matches!(
            require_valid(&settings),
            Err(SettingsError::Validation { .. })
        ));
    }

    #[test]
    fn warnings_do_not_fail_validation() {
        let settings = AnalysisSettings {
            decomposition_number: Some(0),
            ..AnalysisSettings::default()
        };
        assert_eq!(validate_settings(&settings).unwrap_err().len(), 1);
        assert!(require_valid(&settings).is_ok());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_settings(dir.path()).unwrap().is_none());

        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "alpha = 0.75\n").unwrap();
        let settings = discover_settings(dir.path()).unwrap().unwrap();
        assert_eq!(settings.alpha, Some(0.75));

        let missing = dir.path().join("other.toml");
        assert!(matches!(
            load_settings_toml(&missing),
            Err(SettingsError::NotFound { .. })
        ));
    }

    #[test]
    fn malformed_toml_reported() {
        assert!(matches!(
            parse_settings_toml("alpha = ["),
            Err(SettingsError::Toml(_))
        ));
    }
}
