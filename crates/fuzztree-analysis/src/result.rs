//! Per-configuration results and the batch report.

use std::fmt;

use fuzztree_config::{Configuration, ConfigurationId};
use fuzztree_core::{AlphaCut, Interval, Issue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of analyzing one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub config_id: ConfigurationId,
    /// False when a fatal issue aborted the task.
    pub valid_result: bool,
    /// Top event probability; absent for invalid results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<Interval>,
    /// Decomposed result, ascending by alpha.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpha_cuts: Vec<AlphaCut>,
    pub cost: u64,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl AnalysisResult {
    pub fn valid(config: &Configuration, probability: Interval, alpha_cuts: Vec<AlphaCut>) -> Self {
        Self {
            config_id: config.id(),
            valid_result: true,
            probability: Some(probability),
            alpha_cuts,
            cost: config.cost(),
            issues: Vec::new(),
        }
    }

    pub fn invalid(config: &Configuration, issue: Issue) -> Self {
        Self {
            config_id: config.id(),
            valid_result: false,
            probability: None,
            alpha_cuts: Vec::new(),
            cost: config.cost(),
            issues: vec![issue],
        }
    }

    /// Prepend issues raised before the task finished (e.g. warnings).
    pub fn with_leading_issues(mut self, mut issues: Vec<Issue>) -> Self {
        issues.append(&mut self.issues);
        self.issues = issues;
        self
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.probability, self.valid_result) {
            (Some(p), true) => write!(f, "#{}: {p} (cost {})", self.config_id, self.cost),
            _ => {
                let reason = self
                    .issues
                    .iter()
                    .find(|i| i.is_fatal())
                    .map_or("unknown failure", |i| i.message.as_str());
                write!(f, "#{}: INVALID ({reason})", self.config_id)
            }
        }
    }
}

/// A configuration paired with its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub configuration: Configuration,
    pub result: AnalysisResult,
}

/// Ordered results of analyzing every configuration of one tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    /// Fingerprint of the analyzed template.
    pub model_id: String,
    pub tree_id: String,
    pub duration_ms: u64,
    /// `entries[i]` belongs to the i-th generated configuration.
    pub entries: Vec<BatchEntry>,
    /// Issues concerning the template as a whole.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl BatchReport {
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.valid_result).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.entries.len() - self.valid_count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Analysis Report ===")?;
        writeln!(f, "Tree: {}", self.tree_id)?;
        writeln!(f, "Model: {:.12}", self.model_id)?;
        writeln!(f, "Run: {}", self.run_id)?;
        writeln!(f, "Duration: {} ms", self.duration_ms)?;
        writeln!(f)?;

        writeln!(
            f,
            "--- Configurations: {} ({} valid, {} invalid) ---",
            self.entries.len(),
            self.valid_count(),
            self.invalid_count()
        )?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry.result)?;
            writeln!(f, "    {}", entry.configuration)?;
            for cut in &entry.result.alpha_cuts {
                writeln!(f, "    alpha {:.3}: {}", cut.alpha, cut.interval)?;
            }
            for issue in entry.result.issues.iter().filter(|i| !i.is_fatal()) {
                writeln!(f, "    {issue}")?;
            }
        }

        if !self.issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Tree Issues ({}) ---", self.issues.len())?;
            for issue in &self.issues {
                writeln!(f, "  {issue}")?;
            }
        }

        Ok(())
    }
}
