//! Reliability analysis of variability fault trees.
//!
//! [`run_batch`] generates every configuration of a template, instantiates
//! and analyzes each one on a worker pool, and collects the results in
//! configuration order into a [`BatchReport`].

pub mod analyzer;
pub mod error;
pub mod gates;
pub mod pipeline;
pub mod result;
pub mod settings;

pub use analyzer::ReliabilityAnalyzer;
pub use error::{AnalysisError, SettingsError};
pub use pipeline::{analyze_configuration, run_batch};
pub use result::{AnalysisResult, BatchEntry, BatchReport};
pub use settings::AnalysisSettings;
