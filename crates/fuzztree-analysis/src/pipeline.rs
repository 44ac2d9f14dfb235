//! Batch orchestrator: generate -> instantiate -> analyze, per configuration.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use fuzztree_config::{Configuration, ConfigurationSpaceGenerator, TreeInstantiator};
use fuzztree_core::hash::fingerprint;
use fuzztree_core::{AlphaCut, Interval, Issue, IssueScope, IssueSink, VariabilityTree};
use rayon::prelude::*;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::analyzer::ReliabilityAnalyzer;
use crate::error::AnalysisError;
use crate::result::{AnalysisResult, BatchEntry, BatchReport};
use crate::settings::AnalysisSettings;

/// What one task produced before it finished or failed.
struct TaskOutcome {
    result: Result<(Interval, Vec<AlphaCut>), AnalysisError>,
    warnings: Vec<Issue>,
}

/// Analyze every configuration of `tree`.
///
/// Tasks run on the rayon pool unless `settings.parallel` is off. A failing
/// or panicking task only invalidates its own slot; `entries[i]` always
/// belongs to the i-th generated configuration.
pub fn run_batch(tree: &VariabilityTree, settings: &AnalysisSettings) -> BatchReport {
    let start = Instant::now();
    let run_id = Uuid::new_v4();
    info!(%run_id, tree = %tree.id, "starting analysis batch");

    let sink = IssueSink::new();
    let configurations = ConfigurationSpaceGenerator::new(tree, &sink).generate();
    let instantiator = TreeInstantiator::new(tree);

    let task = |(slot, config): (usize, &Configuration)| {
        analyze_configuration(&instantiator, config, slot, settings, &sink)
    };
    let results: Vec<AnalysisResult> = if settings.parallel {
        configurations.par_iter().enumerate().map(task).collect()
    } else {
        configurations.iter().enumerate().map(task).collect()
    };

    let entries: Vec<BatchEntry> = configurations
        .into_iter()
        .zip(results)
        .map(|(configuration, result)| BatchEntry {
            configuration,
            result,
        })
        .collect();

    let report = BatchReport {
        run_id,
        model_id: fingerprint(tree),
        tree_id: tree.id.clone(),
        duration_ms: start.elapsed().as_millis() as u64,
        entries,
        issues: sink.for_scope(IssueScope::Tree),
    };
    info!(
        %run_id,
        configurations = report.entries.len(),
        valid = report.valid_count(),
        duration_ms = report.duration_ms,
        "analysis batch finished"
    );
    report
}

/// Instantiate and analyze one configuration, recording its issues in `sink`
/// under `slot`.
pub fn analyze_configuration(
    instantiator: &TreeInstantiator<'_>,
    config: &Configuration,
    slot: usize,
    settings: &AnalysisSettings,
    sink: &IssueSink,
) -> AnalysisResult {
    let outcome = guarded(|| run_task(instantiator, config, settings));

    let result = match outcome.result {
        Ok((probability, cuts)) => {
            debug!(config = config.id(), %probability, "configuration analyzed");
            AnalysisResult::valid(config, probability, cuts)
        }
        Err(err) => {
            debug!(config = config.id(), error = %err, "configuration invalid");
            AnalysisResult::invalid(config, err.to_issue())
        }
    }
    .with_leading_issues(outcome.warnings);

    sink.extend(IssueScope::Configuration(slot), result.issues.iter().cloned());
    result
}

fn run_task(
    instantiator: &TreeInstantiator<'_>,
    config: &Configuration,
    settings: &AnalysisSettings,
) -> TaskOutcome {
    let tree = match instantiator.instantiate(config) {
        Ok(tree) => tree,
        Err(err) => {
            return TaskOutcome {
                result: Err(err.into()),
                warnings: Vec::new(),
            }
        }
    };

    let mut analyzer = ReliabilityAnalyzer::new(&tree, settings);
    let levels = settings
        .decomposition_number
        .or(tree.decomposition_number)
        .filter(|&d| d > 0);
    let result = analyzer.analyze(settings.alpha).and_then(|probability| {
        let cuts = match levels {
            Some(levels) => analyzer.decompose(levels)?,
            None => Vec::new(),
        };
        Ok((probability, cuts))
    });

    TaskOutcome {
        result,
        warnings: analyzer.into_warnings(),
    }
}

/// Run `task`, turning a panic into an invalid outcome.
fn guarded(task: impl FnOnce() -> TaskOutcome) -> TaskOutcome {
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(%message, "analysis task panicked");
            TaskOutcome {
                result: Err(AnalysisError::Panicked(message)),
                warnings: Vec::new(),
            }
        }
    }
}
